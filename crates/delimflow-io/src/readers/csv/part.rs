//! `CsvPart` and its row cursor.
//!
//! Reader lifecycle:
//!
//! ```text
//! CsvPart (unopened) --open--> Opened { header records left } --> Streaming --> Closed
//! ```
//!
//! `Closed` is terminal and is reached on end of input, on the first error
//! (IO, parse, or row-width mismatch), on `close()`, and on drop. The parse
//! session is released on every one of those paths.

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use delimflow_core::row::Row;
use delimflow_core::schema::Schema;
use delimflow_core::source::{Part, SourceReader};

use super::header::Header;
use super::session::{CsvSession, ParserSettings};
use crate::error::{Error, Result};

/// The whole file as one unit of read work.
#[derive(Debug, Clone)]
pub struct CsvPart {
    path: PathBuf,
    settings: ParserSettings,
    header: Header,
    verify_rows: bool,
    schema: Arc<Schema>,
}

impl CsvPart {
    /// `verify_rows` is ignored for `Header::None`.
    pub fn new(
        path: PathBuf,
        settings: ParserSettings,
        header: Header,
        verify_rows: bool,
        schema: Schema,
    ) -> Self {
        Self {
            path,
            settings,
            header,
            verify_rows: verify_rows && header.allows_verification(),
            schema: Arc::new(schema),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn verify_rows(&self) -> bool {
        self.verify_rows
    }

    /// Start a new parse pass. Every call opens its own session.
    pub fn open(&self) -> Result<CsvReader> {
        let session = CsvSession::open(&self.path, &self.settings)?;
        Ok(CsvReader {
            session,
            schema: Arc::clone(&self.schema),
            verify_rows: self.verify_rows,
            state: ReaderState::Opened {
                header_records: self.header.records_to_skip(),
            },
            rows_read: 0,
        })
    }
}

impl Part for CsvPart {
    fn reader(&self) -> Result<Box<dyn SourceReader>> {
        let reader: Box<dyn SourceReader> = Box::new(self.open()?);
        Ok(reader)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Opened { header_records: usize },
    Streaming,
    Closed,
}

/// Lazy, single-pass row cursor over one `CsvPart`.
#[derive(Debug)]
pub struct CsvReader {
    session: CsvSession,
    schema: Arc<Schema>,
    verify_rows: bool,
    state: ReaderState,
    rows_read: u64,
}

impl CsvReader {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows yielded so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn is_closed(&self) -> bool {
        self.state == ReaderState::Closed
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if let ReaderState::Opened { header_records } = self.state {
            for _ in 0..header_records {
                if self.session.parse_next()?.is_none() {
                    return Ok(None);
                }
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(header_records, "discarded header records");
            self.state = ReaderState::Streaming;
        }

        let values = match self.session.parse_next()? {
            Some(values) => values,
            None => return Ok(None),
        };

        if self.verify_rows && values.len() != self.schema.len() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                found = values.len(),
                expected = self.schema.len(),
                row = self.rows_read,
                "row width does not match schema"
            );
            return Err(Error::RowMismatch {
                found: values.len(),
                expected: self.schema.len(),
                row: values,
                columns: self.schema.column_names(),
            });
        }

        self.rows_read += 1;
        Ok(Some(Row::new(Arc::clone(&self.schema), values)))
    }
}

impl Iterator for CsvReader {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_closed() {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.close();
                None
            }
            Err(e) => {
                self.close();
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for CsvReader {}

impl SourceReader for CsvReader {
    fn close(&mut self) {
        self.session.stop();
        self.state = ReaderState::Closed;
    }
}

impl Drop for CsvReader {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("delimflow-part-{name}-{}.csv", std::process::id()));
        fs::write(&path, contents).expect("write temp csv");
        path
    }

    fn part(path: &Path, header: Header, verify: bool, columns: &[&str]) -> CsvPart {
        CsvPart::new(
            path.to_path_buf(),
            ParserSettings::default(),
            header,
            verify,
            Schema::from_column_names(columns.iter().copied()),
        )
    }

    #[test]
    fn first_row_is_discarded() {
        let path = temp_file("discard", "a,b\n1,2\n3,4\n");
        let rows: Vec<Row> = part(&path, Header::FirstRow, true, &["a", "b"])
            .open()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values(), ["1", "2"]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn mismatch_stops_the_stream_and_closes() {
        let path = temp_file("mismatch", "a,b,c\n1,2,3\n4,5\n6,7,8\n");
        let mut reader = part(&path, Header::FirstRow, true, &["a", "b", "c"])
            .open()
            .unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::RowMismatch {
                found: 2,
                expected: 3,
                ..
            }
        ));
        assert!(reader.is_closed());
        assert!(reader.next().is_none());
        assert_eq!(reader.rows_read(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn header_none_never_verifies() {
        let path = temp_file("none-verify", "1,2\n3\n");
        let p = part(&path, Header::None, true, &["0", "1"]);
        assert!(!p.verify_rows());
        let rows: Vec<Row> = p.open().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn header_only_file_yields_nothing() {
        let path = temp_file("header-only", "a,b\n");
        let mut reader = part(&path, Header::FirstRow, true, &["a", "b"])
            .open()
            .unwrap();
        assert!(reader.next().is_none());
        assert!(reader.is_closed());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn explicit_close_is_terminal() {
        let path = temp_file("close", "a\n1\n2\n");
        let mut reader = part(&path, Header::FirstRow, true, &["a"]).open().unwrap();
        assert_eq!(reader.next().unwrap().unwrap().get(0), Some("1"));
        reader.close();
        assert!(reader.is_closed());
        assert!(reader.next().is_none());
        let _ = fs::remove_file(&path);
    }
}
