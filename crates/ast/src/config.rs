use serde::{Deserialize, Serialize};

/// Configuration for loading source samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Decode non-UTF-8 sources as ISO-8859-1 instead of failing
    pub latin1_fallback: bool,

    /// Resolve a relative source path against the sidecar's directory when it
    /// does not exist relative to the working directory
    pub resolve_relative_to_sidecar: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            latin1_fallback: true,
            resolve_relative_to_sidecar: true,
        }
    }
}

impl SampleConfig {
    /// Strict config: UTF-8 only, paths taken literally
    #[must_use]
    pub fn strict() -> Self {
        Self {
            latin1_fallback: false,
            resolve_relative_to_sidecar: false,
        }
    }
}
