//! Pull-based readers that produce rows one at a time.

pub mod csv;
