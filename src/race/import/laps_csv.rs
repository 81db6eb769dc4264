use crate::race::import::ImportError;
use crate::race::LapRecord;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads lap records from a CSV file with the columns
/// `lap_number, compound, tyre_age, lap_time_seconds`.
pub fn import_laps(filename: &str) -> Result<Vec<LapRecord>, ImportError> {
    if !Path::new(filename).exists() {
        return Err(ImportError::MissingFile(filename.to_string()));
    }

    let file = File::open(filename)
        .map_err(|err| ImportError::MissingFile(format!("{}: {}", filename, err)))?;
    read_laps(file)
}

/// Reads and checks lap records, returning them ordered by lap number.
pub fn read_laps<R: Read>(reader: R) -> Result<Vec<LapRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize().enumerate() {
        let record: LapRecord = result?;
        if record.lap_number == 0 {
            return Err(ImportError::InvalidFormat(format!(
                "row {}: lap numbers start at 1",
                row + 1
            )));
        }
        if !(record.lap_time_seconds.is_finite() && record.lap_time_seconds > 0.0) {
            return Err(ImportError::InvalidFormat(format!(
                "row {}: lap time {} is not a positive number",
                row + 1,
                record.lap_time_seconds
            )));
        }
        records.push(record);
    }

    records.sort_by_key(|record| record.lap_number);
    Ok(records)
}
