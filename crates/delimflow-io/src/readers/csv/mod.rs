//! Delimited-text source.
//!
//! `CsvSource` is the immutable configuration; it resolves the schema from
//! the file header (or an override) and hands out a single `CsvPart` that
//! covers the whole file. Each `CsvPart::open` starts an independent
//! `CsvSession` and wraps it in a `CsvReader`, a lazy single-pass row cursor.

mod filter;
pub mod format;
pub mod header;
pub mod part;
pub mod session;
pub mod source;

pub use format::CsvFormat;
pub use header::Header;
pub use part::{CsvPart, CsvReader};
pub use session::{CsvSession, ParserSettings};
pub use source::CsvSource;
