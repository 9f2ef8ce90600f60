//! Interactive mode selection.

use contract_scanner_ingestion::BlockRange;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const DEFAULT_ADDRESS_FILE: &str = "addresses.txt";

/// What the operator asked to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Blocks(BlockRange),
    Addresses(PathBuf),
}

impl ScanRequest {
    /// Output file used when the operator does not name one.
    pub fn default_output(&self) -> PathBuf {
        match self {
            ScanRequest::Blocks(range) => match range.end {
                Some(end) => format!("contracts_blocks_{}_{}.csv", range.start, end).into(),
                None => format!("contracts_blocks_{}_latest.csv", range.start).into(),
            },
            ScanRequest::Addresses(_) => PathBuf::from("contracts_from_list.csv"),
        }
    }
}

/// Print `message` and read one trimmed line of input.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> anyhow::Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("Input closed while waiting for an answer");
    }
    Ok(line.trim().to_string())
}

/// Ask the operator which scan to run.
pub fn choose_scan<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<ScanRequest> {
    writeln!(output, "Select scan mode:")?;
    writeln!(output, "  1. Scan a block range for contract deployments")?;
    writeln!(output, "  2. Scan contract addresses listed in a text file")?;

    match ask(input, output, "Enter option (1 or 2): ")?.as_str() {
        "1" => {
            let start = ask(input, output, "Start block: ")?;
            let end = ask(input, output, "End block (empty for latest): ")?;
            let range: BlockRange = format!("{}-{}", start, end).parse()?;
            Ok(ScanRequest::Blocks(range))
        }
        "2" => {
            let file = ask(
                input,
                output,
                &format!("Address file (default: {}): ", DEFAULT_ADDRESS_FILE),
            )?;
            let file = if file.is_empty() {
                DEFAULT_ADDRESS_FILE.to_string()
            } else {
                file
            };
            Ok(ScanRequest::Addresses(PathBuf::from(file)))
        }
        other => anyhow::bail!("Invalid option: {:?}", other),
    }
}

/// Ask for the output file name, falling back to `default`.
pub fn choose_output<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: PathBuf,
) -> anyhow::Result<PathBuf> {
    let answer = ask(
        input,
        output,
        &format!("Save to file (default: {}): ", default.display()),
    )?;
    Ok(if answer.is_empty() {
        default
    } else {
        PathBuf::from(answer)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> anyhow::Result<ScanRequest> {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        choose_scan(&mut input, &mut output)
    }

    #[test]
    fn block_mode_reads_range() {
        let request = run("1\n100\n200\n").unwrap();
        assert_eq!(request, ScanRequest::Blocks(BlockRange::new(100, Some(200))));
        assert_eq!(
            request.default_output(),
            PathBuf::from("contracts_blocks_100_200.csv")
        );
    }

    #[test]
    fn block_mode_with_empty_end_scans_to_head() {
        let request = run(" 1 \n500\n\n").unwrap();
        assert_eq!(request, ScanRequest::Blocks(BlockRange::new(500, None)));
    }

    #[test]
    fn address_mode_defaults_file_name() {
        let request = run("2\n\n").unwrap();
        assert_eq!(
            request,
            ScanRequest::Addresses(PathBuf::from(DEFAULT_ADDRESS_FILE))
        );
        assert_eq!(
            request.default_output(),
            PathBuf::from("contracts_from_list.csv")
        );
    }

    #[test]
    fn address_mode_uses_given_file() {
        let request = run("2\nvaults.txt\n").unwrap();
        assert_eq!(request, ScanRequest::Addresses(PathBuf::from("vaults.txt")));
    }

    #[test]
    fn rejects_unknown_option_and_bad_numbers() {
        assert!(run("3\n").is_err());
        assert!(run("1\nten\n20\n").is_err());
        assert!(run("1\n20\n10\n").is_err());
        assert!(run("").is_err());
    }

    #[test]
    fn output_prompt_falls_back_to_default() {
        let mut output = Vec::new();
        let default = PathBuf::from("contracts_from_list.csv");

        let chosen = choose_output(&mut Cursor::new(b"\n".to_vec()), &mut output, default.clone()).unwrap();
        assert_eq!(chosen, default);

        let chosen = choose_output(&mut Cursor::new(b"mine.csv\n".to_vec()), &mut output, default).unwrap();
        assert_eq!(chosen, PathBuf::from("mine.csv"));
    }
}
