#![forbid(unsafe_code)]
//! delimflow-core: the vocabulary shared by every delimflow source.
//!
//! - `schema`: ordered column definitions.
//! - `row`: a schema reference plus positional text values.
//! - `source`: the `Source` / `Part` / `SourceReader` pull interfaces.
//! - `infer`: strategies that turn header tokens into a `Schema`.
//! - `config`: process-level defaults (env-driven).
//!
//! No file IO lives here; concrete readers are in `delimflow-io`.

pub mod config;
pub mod error;
pub mod infer;
pub mod prelude;
pub mod row;
pub mod schema;
pub mod source;

pub use error::{Error, Result};
