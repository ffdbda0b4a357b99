use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters that shape how a delimited file is tokenized.
///
/// When `quote_escape` equals `quote_char` a quote inside a quoted field is
/// written doubled (`""`), as in RFC 4180.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    pub delimiter: char,
    pub quote_char: char,
    pub quote_escape: char,
    /// Lines starting with this character at a record boundary are comments.
    pub comment_char: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            quote_escape: '"',
            comment_char: '#',
        }
    }
}

impl CsvFormat {
    pub fn with_delimiter(self, delimiter: char) -> Self {
        Self { delimiter, ..self }
    }

    pub fn with_quote_char(self, quote_char: char) -> Self {
        Self { quote_char, ..self }
    }

    pub fn with_quote_escape(self, quote_escape: char) -> Self {
        Self {
            quote_escape,
            ..self
        }
    }

    pub fn with_comment_char(self, comment_char: char) -> Self {
        Self {
            comment_char,
            ..self
        }
    }

    /// Byte form used by the tokenizer. Only single-byte (ASCII) characters
    /// are supported.
    pub(crate) fn to_bytes(self) -> Result<FormatBytes> {
        Ok(FormatBytes {
            delimiter: ascii_byte("delimiter", self.delimiter)?,
            quote: ascii_byte("quote", self.quote_char)?,
            escape: ascii_byte("quote escape", self.quote_escape)?,
            comment: ascii_byte("comment", self.comment_char)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormatBytes {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: u8,
    pub comment: u8,
}

impl FormatBytes {
    pub fn doubled_quotes(&self) -> bool {
        self.escape == self.quote
    }
}

fn ascii_byte(what: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::Config(format!(
            "{what} character {c:?} is not a single-byte ASCII character"
        )))
    }
}
