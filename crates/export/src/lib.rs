//! Contract record model and CSV export.

pub mod models;
pub mod writer;

pub use models::ContractRecord;
pub use writer::{export_to_csv, COLUMNS};
