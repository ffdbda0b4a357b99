//! Row values produced by sources.
//!
//! Every value is text; typing is left to downstream consumers. A row does
//! not check its width against the schema on construction. Readers that
//! verify rows do so at read time.

use std::sync::Arc;

use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Row {
    pub fn new(schema: Arc<Schema>, values: Vec<String>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    /// Look up a value by column name via the row's schema.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.schema.index_of(name).and_then(|idx| self.get(idx))
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}
