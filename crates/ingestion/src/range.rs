//! Inclusive block ranges given on the command line.

use std::fmt;
use std::str::FromStr;

/// Inclusive block range. An open end means "up to the chain head".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl BlockRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// Resolve an open end against the current chain head.
    ///
    /// # Returns
    /// The inclusive `(start, end)` pair to scan
    pub fn resolve(&self, latest_block: u64) -> (u64, u64) {
        (self.start, self.end.unwrap_or(latest_block))
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-", self.start),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRangeError {
    #[error("invalid block range format, expected start-end or start-")]
    Format,
    #[error("invalid start block: {0}")]
    Start(String),
    #[error("invalid end block: {0}")]
    End(String),
    #[error("end block {end} is before start block {start}")]
    Inverted { start: u64, end: u64 },
}

impl FromStr for BlockRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.trim().split_once('-').ok_or(ParseRangeError::Format)?;
        let (start, end) = (start.trim(), end.trim());

        let start = start
            .parse::<u64>()
            .map_err(|_| ParseRangeError::Start(start.to_string()))?;

        if end.is_empty() {
            return Ok(Self::new(start, None));
        }

        let end = end
            .parse::<u64>()
            .map_err(|_| ParseRangeError::End(end.to_string()))?;
        if end < start {
            return Err(ParseRangeError::Inverted { start, end });
        }

        Ok(Self::new(start, Some(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_range() {
        let range: BlockRange = "100-250".parse().unwrap();
        assert_eq!(range, BlockRange::new(100, Some(250)));
        assert_eq!(range.resolve(9_999), (100, 250));
        assert_eq!(range.to_string(), "100-250");
    }

    #[test]
    fn parses_open_range() {
        let range: BlockRange = " 1000 - ".parse().unwrap();
        assert_eq!(range, BlockRange::new(1000, None));
        assert_eq!(range.resolve(1200), (1000, 1200));
        assert_eq!(range.to_string(), "1000-");
    }

    #[test]
    fn single_block_range() {
        let range: BlockRange = "7-7".parse().unwrap();
        assert_eq!(range.resolve(0), (7, 7));
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert_eq!("100".parse::<BlockRange>(), Err(ParseRangeError::Format));
        assert_eq!(
            "-100".parse::<BlockRange>(),
            Err(ParseRangeError::Start(String::new()))
        );
        assert_eq!(
            "1-2-3".parse::<BlockRange>(),
            Err(ParseRangeError::End("2-3".to_string()))
        );
        assert_eq!(
            "abc-10".parse::<BlockRange>(),
            Err(ParseRangeError::Start("abc".to_string()))
        );
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            "20-10".parse::<BlockRange>(),
            Err(ParseRangeError::Inverted { start: 20, end: 10 })
        );
    }
}
