//! `CsvSource`: immutable configuration plus schema resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use delimflow_core::config::SourceDefaults;
use delimflow_core::infer::{SchemaInferrer, StringInferrer};
use delimflow_core::schema::Schema;
use delimflow_core::source::{Part, Source};

use super::format::CsvFormat;
use super::header::Header;
use super::part::CsvPart;
use super::session::{CsvSession, ParserSettings};
use crate::error::Result;

/// A delimited text file exposed as a tabular source.
///
/// Every `with_*` method consumes the configuration and returns a new one;
/// clone first to derive several variants from a common base.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    override_schema: Option<Schema>,
    format: CsvFormat,
    inferrer: Arc<dyn SchemaInferrer>,
    ignore_leading_whitespaces: bool,
    ignore_trailing_whitespaces: bool,
    skip_empty_lines: bool,
    empty_cell_value: Option<String>,
    verify_rows: Option<bool>,
    header: Header,
    defaults: SourceDefaults,
}

impl CsvSource {
    /// Source over `path` with default settings. Process defaults are read
    /// from the environment (see [`SourceDefaults::from_env`]).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            override_schema: None,
            format: CsvFormat::default(),
            inferrer: Arc::new(StringInferrer),
            ignore_leading_whitespaces: true,
            ignore_trailing_whitespaces: true,
            skip_empty_lines: true,
            empty_cell_value: None,
            verify_rows: None,
            header: Header::default(),
            defaults: SourceDefaults::from_env(),
        }
    }

    pub fn with_schema_inferrer(self, inferrer: Arc<dyn SchemaInferrer>) -> Self {
        Self { inferrer, ..self }
    }

    pub fn with_header(self, header: Header) -> Self {
        Self { header, ..self }
    }

    /// Use `schema` as-is; the file header is never read.
    pub fn with_schema(self, schema: Schema) -> Self {
        Self {
            override_schema: Some(schema),
            ..self
        }
    }

    pub fn with_delimiter(self, c: char) -> Self {
        let format = self.format.with_delimiter(c);
        Self { format, ..self }
    }

    pub fn with_quote_char(self, c: char) -> Self {
        let format = self.format.with_quote_char(c);
        Self { format, ..self }
    }

    pub fn with_quote_escape(self, c: char) -> Self {
        let format = self.format.with_quote_escape(c);
        Self { format, ..self }
    }

    pub fn with_comment_char(self, c: char) -> Self {
        let format = self.format.with_comment_char(c);
        Self { format, ..self }
    }

    pub fn with_format(self, format: CsvFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_verify_rows(self, verify_rows: bool) -> Self {
        Self {
            verify_rows: Some(verify_rows),
            ..self
        }
    }

    pub fn with_empty_cell_value(self, value: impl Into<String>) -> Self {
        Self {
            empty_cell_value: Some(value.into()),
            ..self
        }
    }

    pub fn with_skip_empty_lines(self, skip_empty_lines: bool) -> Self {
        Self {
            skip_empty_lines,
            ..self
        }
    }

    pub fn with_ignore_leading_whitespaces(self, ignore: bool) -> Self {
        Self {
            ignore_leading_whitespaces: ignore,
            ..self
        }
    }

    pub fn with_ignore_trailing_whitespaces(self, ignore: bool) -> Self {
        Self {
            ignore_trailing_whitespaces: ignore,
            ..self
        }
    }

    /// Replace the defaults captured at construction.
    pub fn with_defaults(self, defaults: SourceDefaults) -> Self {
        Self { defaults, ..self }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn format(&self) -> CsvFormat {
        self.format
    }

    /// Whether row readers will check row width against the schema.
    ///
    /// Order: `Header::None` forces it off, then the explicit
    /// `with_verify_rows` value, then the source defaults.
    pub fn effective_verify_rows(&self) -> bool {
        if !self.header.allows_verification() {
            return false;
        }
        self.verify_rows.unwrap_or(self.defaults.verify_rows)
    }

    pub fn parser_settings(&self) -> ParserSettings {
        ParserSettings {
            format: self.format,
            ignore_leading_whitespaces: self.ignore_leading_whitespaces,
            ignore_trailing_whitespaces: self.ignore_trailing_whitespaces,
            skip_empty_lines: self.skip_empty_lines,
            empty_cell_value: self.empty_cell_value.clone(),
        }
    }

    /// Resolve the schema: the override if set, otherwise the file header
    /// run through the schema inferrer. Re-reads the file on every call.
    pub fn resolve_schema(&self) -> Result<Schema> {
        if let Some(schema) = &self.override_schema {
            return Ok(schema.clone());
        }
        let tokens = self.header_tokens()?;
        let schema = self.inferrer.schema_of(&tokens);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %self.path.display(),
            header = ?self.header,
            columns = schema.len(),
            "resolved csv schema"
        );

        Ok(schema)
    }

    /// The single part covering the whole file.
    pub fn part(&self) -> Result<CsvPart> {
        Ok(CsvPart::new(
            self.path.clone(),
            self.parser_settings(),
            self.header,
            self.effective_verify_rows(),
            self.resolve_schema()?,
        ))
    }

    fn header_tokens(&self) -> Result<Vec<String>> {
        let settings = self.parser_settings();
        let mut session = CsvSession::open(&self.path, &settings)?;
        let tokens = match self.header {
            Header::None => {
                let width = session.parse_next()?.map_or(0, |record| record.len());
                (0..width).map(|i| i.to_string()).collect()
            }
            Header::FirstComment => {
                while session.first_comment().is_none() && session.parse_next()?.is_some() {}
                session
                    .first_comment()
                    .map(|line| {
                        line.split(self.format.delimiter)
                            .map(|token| settings.clean_token(token))
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Header::FirstRow => session.parse_next()?.unwrap_or_default(),
        };
        session.stop();
        Ok(tokens)
    }
}

impl Source for CsvSource {
    fn schema(&self) -> Result<Schema> {
        self.resolve_schema()
    }

    fn parts(&self) -> Result<Vec<Box<dyn Part>>> {
        let part: Box<dyn Part> = Box::new(self.part()?);
        Ok(vec![part])
    }
}
