#![forbid(unsafe_code)]
//! delimflow: delimited text files as typed row streams.
//!
//! ```no_run
//! use delimflow::prelude::*;
//!
//! # fn main() -> delimflow::Result<()> {
//! let source = CsvSource::new("people.csv").with_header(Header::FirstRow);
//! let schema = source.schema()?;
//! for part in source.parts()? {
//!     for row in part.reader()? {
//!         let row = row?;
//!         println!("{:?} -> {:?}", schema.column_names(), row.values());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use delimflow_core::config::{SourceDefaults, VERIFY_ROWS_ENV};
pub use delimflow_core::{Error, Result};

pub mod prelude {
    pub use delimflow_core::prelude::*;
    pub use delimflow_io::{CsvFormat, CsvPart, CsvReader, CsvSource, Header};
}
