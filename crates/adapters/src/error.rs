use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("CSV import failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV import failed at line {line}: {message}")]
    CsvRow { line: usize, message: String },

    #[error(transparent)]
    InvalidBatch(#[from] core_types::CoreError),

    #[error("On-chain decode failed at line {line}: {message}")]
    Decode { line: usize, message: String },

    #[error("Unsupported program version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
