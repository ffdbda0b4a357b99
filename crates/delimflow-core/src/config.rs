//! Source defaults that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`SourceDefaults::from_env`].
pub const VERIFY_ROWS_ENV: &str = "DELIMFLOW_CSV_VERIFY_ROWS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDefaults {
    /// Check every row's field count against the schema unless a source
    /// overrides it explicitly.
    pub verify_rows: bool,
}

impl Default for SourceDefaults {
    fn default() -> Self {
        Self { verify_rows: true }
    }
}

impl SourceDefaults {
    /// Create defaults from environment variables, falling back to built-ins.
    ///
    /// Environment variables:
    /// - `DELIMFLOW_CSV_VERIFY_ROWS`: `true`/`false` (also `1`/`0`, `yes`/`no`)
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var(VERIFY_ROWS_ENV) {
            if let Some(v) = parse_bool(&s) {
                cfg.verify_rows = v;
            }
        }

        cfg
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
