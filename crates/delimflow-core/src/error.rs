use thiserror::Error;

/// Canonical result for every delimflow crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input reported by the record tokenizer.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A row whose field count disagrees with the schema (only raised when
    /// row verification is enabled).
    #[error(
        "Row has {found} fields but schema has {expected}\nRow={}\nSchema={}",
        .row.join(", "),
        .columns.join(", ")
    )]
    RowMismatch {
        found: usize,
        expected: usize,
        row: Vec<String>,
        columns: Vec<String>,
    },
}

impl Error {
    /// True for the per-row verification failure.
    pub fn is_row_mismatch(&self) -> bool {
        matches!(self, Error::RowMismatch { .. })
    }
}
