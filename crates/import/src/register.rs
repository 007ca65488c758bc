use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use ynab_monarch_core::RegisterRow;

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Read a YNAB register export. The header row decides which column is
/// which; unknown columns are ignored and missing ones read as empty.
pub fn read_register<R: Read>(mut data: R) -> Result<Vec<RegisterRow>, RegisterError> {
    let mut content = String::new();
    data.read_to_string(&mut content)?;
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<RegisterRow>, _>>()?;

    tracing::debug!("Read {} register rows", rows.len());
    Ok(rows)
}

pub fn load_register(path: &Path) -> Result<Vec<RegisterRow>, RegisterError> {
    let file = File::open(path)?;
    read_register(file)
}
