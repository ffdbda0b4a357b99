//! Convenient re-exports for downstream crates.

pub use crate::config::SourceDefaults;
pub use crate::error::{Error, Result};
pub use crate::infer::{SchemaInferrer, StringInferrer};
pub use crate::row::Row;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::source::{Part, Source, SourceReader};
