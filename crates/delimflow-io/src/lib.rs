#![forbid(unsafe_code)]
//! delimflow-io: file-backed sources.
//!
//! Only delimited text is supported today. Every source here reads from the
//! local filesystem with blocking IO and hands rows out one at a time; no
//! background threads, no read-ahead beyond the parser's own buffer.

pub mod error;
pub mod readers;

pub use error::{Error, Result};
pub use readers::csv::{
    CsvFormat, CsvPart, CsvReader, CsvSession, CsvSource, Header, ParserSettings,
};
