//! IO-layer errors map into the canonical core `Error`.

pub use delimflow_core::error::{Error, Result};

/// Convert a tokenizer error. IO failures keep their `io::Error`; everything
/// else (bad UTF-8, unequal lengths, ...) becomes `Error::Parse` with the
/// parser's position info in the message.
pub(crate) fn from_csv(err: csv::Error) -> Error {
    let msg = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        _ => Error::Parse(msg),
    }
}
