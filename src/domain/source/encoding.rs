use serde::{Deserialize, Serialize};

/// Result of encoding detection. `confidence` is in `[0, 1]` and advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEncoding {
    /// WHATWG encoding name, e.g. `UTF-8` or `windows-1252`
    pub name: String,
    pub confidence: f32,
}

impl DetectedEncoding {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
