use thiserror::Error;
use std::num::{ParseFloatError, ParseIntError};

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("Parse int error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Parse float error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, InsightsError>;

// 用于从字符串创建错误
impl From<String> for InsightsError {
    fn from(s: String) -> Self {
        InsightsError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for InsightsError {
    fn from(s: &str) -> Self {
        InsightsError::Unknown(s.to_string())
    }
}
