use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod annotation;
pub mod deseq;

/// Cell values read as missing, mirroring the NA spellings R and pandas emit.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// Opens a text file, transparently decompressing `.gz` inputs.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "file not found: {}",
            path.display()
        )));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.iter().any(|&t| t == trimmed)
}

/// Parses an optional float; missing tokens and non-finite values map to
/// `None`.
pub fn parse_optional_f64(
    value: &str,
    line_no: usize,
    column: &str,
) -> Result<Option<f64>, InputError> {
    if is_missing(value) {
        return Ok(None);
    }
    let trimmed = value.trim();
    let parsed = trimmed.parse::<f64>().map_err(|_| {
        InputError::Parse(format!(
            "line {}: column {} has non-numeric value {:?}",
            line_no, column, trimmed
        ))
    })?;
    Ok(Some(parsed).filter(|v| v.is_finite()))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
