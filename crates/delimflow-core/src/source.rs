//! Source/Part/Reader interfaces.
//!
//! A `Source` knows its schema and splits itself into `Part`s. Each part
//! opens an independent `SourceReader`: a pull-based, single-pass row cursor
//! that owns whatever resources it needs until it is exhausted, closed, or
//! dropped.

use crate::error::Result;
use crate::row::Row;
use crate::schema::Schema;

pub trait Source {
    /// Resolve the schema. May touch the underlying data on every call.
    fn schema(&self) -> Result<Schema>;

    /// Units of read work. Parts never share reader state.
    fn parts(&self) -> Result<Vec<Box<dyn Part>>>;
}

pub trait Part {
    /// Open a fresh reader over this part.
    fn reader(&self) -> Result<Box<dyn SourceReader>>;
}

/// Forward-only row cursor. Not restartable: once exhausted or closed it
/// only yields `None`.
pub trait SourceReader: Iterator<Item = Result<Row>> {
    /// Release the underlying resources. Idempotent.
    fn close(&mut self);
}
