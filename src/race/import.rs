mod error;
mod laps_csv;

pub use error::ImportError;
pub use laps_csv::{import_laps, read_laps};
