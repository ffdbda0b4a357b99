use serde::{Deserialize, Serialize};

/// Where (if anywhere) the column names of a file live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Header {
    /// No header; columns are named by position (`"0"`, `"1"`, ...).
    None,
    /// The first comment line holds the names, split on the delimiter.
    FirstComment,
    /// The first record holds the names and is not a data row.
    #[default]
    FirstRow,
}

impl Header {
    /// Leading records a row stream must discard before yielding data.
    pub fn records_to_skip(self) -> usize {
        match self {
            Header::FirstRow => 1,
            Header::None | Header::FirstComment => 0,
        }
    }

    /// Without a header there is nothing to check row widths against, so
    /// verification is always off for `None`.
    pub fn allows_verification(self) -> bool {
        !matches!(self, Header::None)
    }
}
