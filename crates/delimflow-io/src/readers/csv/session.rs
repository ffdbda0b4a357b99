//! One parse pass over a delimited file.
//!
//! A `CsvSession` owns the open file handle, the line filter and the `csv`
//! tokenizer. It hands out one record at a time as cleaned-up string fields
//! and reports comment lines seen so far. Sessions are never shared: every
//! schema resolution and every row reader opens its own.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::filter::{FilterOptions, LineFilter};
use super::format::CsvFormat;
use crate::error::{from_csv, Result};

/// Read buffer for the file handle. The tokenizer keeps its own buffer on top.
const FILE_BUFFER_BYTES: usize = 64 * 1024;

type Tokenizer = csv::Reader<LineFilter<BufReader<File>>>;

/// Tokenizer settings derived from a source configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub format: CsvFormat,
    pub ignore_leading_whitespaces: bool,
    pub ignore_trailing_whitespaces: bool,
    pub skip_empty_lines: bool,
    /// Substituted for every empty field, quoted or not, after trimming.
    pub empty_cell_value: Option<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            format: CsvFormat::default(),
            ignore_leading_whitespaces: true,
            ignore_trailing_whitespaces: true,
            skip_empty_lines: true,
            empty_cell_value: None,
        }
    }
}

impl ParserSettings {
    /// Trim one token that did not go through the tokenizer (a comment
    /// header token), then apply the empty-cell sentinel.
    pub fn clean_token(&self, raw: &str) -> String {
        let mut value = raw;
        if self.ignore_leading_whitespaces {
            value = value.trim_start();
        }
        if self.ignore_trailing_whitespaces {
            value = value.trim_end();
        }
        self.fill_empty(value)
    }

    /// Apply the empty-cell sentinel to an already trimmed field.
    pub fn fill_empty(&self, value: &str) -> String {
        match &self.empty_cell_value {
            Some(sentinel) if value.is_empty() => sentinel.clone(),
            _ => value.to_string(),
        }
    }

    pub(crate) fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            skip_empty_lines: self.skip_empty_lines,
            trim_leading: self.ignore_leading_whitespaces,
            trim_trailing: self.ignore_trailing_whitespaces,
        }
    }
}

pub struct CsvSession {
    path: PathBuf,
    settings: ParserSettings,
    reader: Option<Tokenizer>,
    record: StringRecord,
    records_read: u64,
}

impl CsvSession {
    /// Open the file and start a parse pass.
    pub fn open(path: impl AsRef<Path>, settings: &ParserSettings) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let fmt = settings.format.to_bytes()?;
        let file = File::open(&path)?;
        let filter = LineFilter::new(
            BufReader::with_capacity(FILE_BUFFER_BYTES, file),
            fmt,
            settings.filter_options(),
        );

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .delimiter(fmt.delimiter)
            .quote(fmt.quote);
        if fmt.doubled_quotes() {
            builder.double_quote(true).escape(None);
        } else {
            builder.double_quote(false).escape(Some(fmt.escape));
        }
        let reader = builder.from_reader(filter);

        #[cfg(feature = "tracing")]
        tracing::trace!(path = %path.display(), "csv session opened");

        Ok(Self {
            path,
            settings: settings.clone(),
            reader: Some(reader),
            record: StringRecord::new(),
            records_read: 0,
        })
    }

    /// Next record as cleaned fields, or `None` at end of input (or after
    /// `stop`). Unquoted padding was already removed by the line filter.
    pub fn parse_next(&mut self) -> Result<Option<Vec<String>>> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(None),
        };
        if !reader.read_record(&mut self.record).map_err(from_csv)? {
            return Ok(None);
        }
        self.records_read += 1;
        Ok(Some(
            self.record
                .iter()
                .map(|field| self.settings.fill_empty(field))
                .collect(),
        ))
    }

    /// First comment line seen so far, comment character stripped.
    pub fn first_comment(&self) -> Option<&str> {
        self.reader.as_ref().and_then(|r| r.get_ref().first_comment())
    }

    /// Most recent comment line seen so far.
    pub fn last_comment(&self) -> Option<&str> {
        self.reader.as_ref().and_then(|r| r.get_ref().last_comment())
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Close the file handle. Idempotent; later `parse_next` calls yield `None`.
    pub fn stop(&mut self) {
        if self.reader.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                path = %self.path.display(),
                records = self.records_read,
                "csv session stopped"
            );
        }
    }
}

impl std::fmt::Debug for CsvSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSession")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("records_read", &self.records_read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("delimflow-session-{name}-{}.csv", std::process::id()));
        fs::write(&path, contents).expect("write temp csv");
        path
    }

    fn drain(session: &mut CsvSession) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        while let Some(rec) = session.parse_next().expect("parse") {
            out.push(rec);
        }
        out
    }

    #[test]
    fn trims_and_substitutes_empty_cells() {
        let path = temp_file("clean", " a , ,c\n");
        let settings = ParserSettings {
            empty_cell_value: Some("NULL".into()),
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["a", "NULL", "c"]]);
        assert_eq!(session.records_read(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn trimming_can_be_disabled_per_side() {
        let path = temp_file("trim-sides", " a , b \n");
        let settings = ParserSettings {
            ignore_leading_whitespaces: false,
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec![" a", " b"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn padding_outside_quotes_is_not_data() {
        let path = temp_file("pad-quote", " 1, \"p,q\" \n\" x \",y\n");
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert_eq!(
            drain(&mut session),
            vec![vec!["1", "p,q"], vec![" x ", "y"]]
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn quoted_empty_field_gets_sentinel() {
        let path = temp_file("quoted-empty", "\"\",x\n");
        let settings = ParserSettings {
            empty_cell_value: Some("NULL".into()),
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["NULL", "x"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let path = temp_file("ws-lines", "1,2\n   \n\t\n3,4\n");
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["1", "2"], vec!["3", "4"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn quoted_fields_and_custom_delimiter() {
        let path = temp_file("quoted", "x;\"a;b\";\"say \"\"hi\"\"\"\n");
        let settings = ParserSettings {
            format: CsvFormat::default().with_delimiter(';'),
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["x", "a;b", "say \"hi\""]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn backslash_escaped_quotes() {
        let path = temp_file("escape", "\"a\\\"b\",c\n");
        let settings = ParserSettings {
            format: CsvFormat::default().with_quote_escape('\\'),
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["a\"b", "c"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn comments_are_reported_not_returned() {
        let path = temp_file("comments", "#  id,name \n1,a\n");
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["1", "a"]]);
        assert_eq!(session.first_comment(), Some("id,name"));
        assert_eq!(session.last_comment(), Some("id,name"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn crlf_line_endings() {
        let path = temp_file("crlf", "a,b\r\n1,2\r\n");
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["a", "b"], vec!["1", "2"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn kept_blank_lines_become_single_empty_field() {
        let path = temp_file("blank", "a\n\nb\n");
        let settings = ParserSettings {
            skip_empty_lines: false,
            ..ParserSettings::default()
        };
        let mut session = CsvSession::open(&path, &settings).unwrap();
        assert_eq!(drain(&mut session), vec![vec!["a"], vec![""], vec!["b"]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn stop_releases_and_ends_input() {
        let path = temp_file("stop", "1\n2\n");
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert!(session.parse_next().unwrap().is_some());
        session.stop();
        session.stop();
        assert!(!session.is_open());
        assert!(session.parse_next().unwrap().is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvSession::open("/definitely/not/here.csv", &ParserSettings::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("delimflow-session-utf8-{}.csv", std::process::id()));
        fs::write(&path, b"ok\n\xff\xfe,x\n").unwrap();
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        assert!(session.parse_next().unwrap().is_some());
        let err = session.parse_next().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_utf8_comment_is_invalid_data() {
        let mut path = std::env::temp_dir();
        path.push(format!("delimflow-session-comment-utf8-{}.csv", std::process::id()));
        fs::write(&path, b"#\xff\xfe\n1\n").unwrap();
        let mut session = CsvSession::open(&path, &ParserSettings::default()).unwrap();
        match session.parse_next() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected invalid data error, got {other:?}"),
        }
        let _ = fs::remove_file(&path);
    }
}
