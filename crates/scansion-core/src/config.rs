use crate::{SENTINEL_PREFIX, error::ScanError};
use serde::{Deserialize, Serialize};

///
/// ScanConfig
///
/// Caller-supplied scan settings. Deserializes from a partial document;
/// missing keys take their defaults.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Column-name prefix that marks a sentinel column.
    pub sentinel_prefix: String,
}

impl ScanConfig {
    #[must_use]
    pub fn with_sentinel_prefix(prefix: impl Into<String>) -> Self {
        Self {
            sentinel_prefix: prefix.into(),
        }
    }

    /// An empty prefix would turn every column into a sentinel.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.sentinel_prefix.is_empty() {
            return Err(ScanError::structural("sentinel prefix must not be empty"));
        }

        Ok(())
    }

    /// The scoped path named by a sentinel column, if `column` is one.
    #[must_use]
    pub fn sentinel_path<'a>(&self, column: &'a str) -> Option<&'a str> {
        column.strip_prefix(self.sentinel_prefix.as_str())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sentinel_prefix: SENTINEL_PREFIX.to_string(),
        }
    }
}
