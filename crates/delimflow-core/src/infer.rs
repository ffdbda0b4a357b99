//! Schema inference strategies: header tokens in, `Schema` out.

use std::fmt::Debug;

use crate::schema::{Field, Schema};

/// Turns the raw header tokens of a source into its schema.
///
/// Implementations must be deterministic: the same tokens must always yield
/// the same schema, since sources may resolve their schema more than once.
pub trait SchemaInferrer: Debug + Send + Sync {
    fn schema_of(&self, headers: &[String]) -> Schema;
}

/// Every header token becomes a nullable text column.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringInferrer;

impl SchemaInferrer for StringInferrer {
    fn schema_of(&self, headers: &[String]) -> Schema {
        Schema::new(headers.iter().map(|h| Field::text(h.as_str())).collect())
    }
}
