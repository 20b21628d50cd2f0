//! Job records: the normalized unit produced by the input parser.

use serde::{Deserialize, Serialize};

/// A single job to apply for.
///
/// Serialized with the `jd` key for the description, which is the shape
/// the generation step and batch order files expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default = "unknown")]
    pub company: String,

    #[serde(default = "unknown")]
    pub position: String,

    /// Full job description text, kept verbatim.
    #[serde(rename = "jd", default)]
    pub description: String,

    /// Index shared with the generated `{key}-R.pdf` / `{key}-CL.pdf` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<i64>,

    /// 1-based submission order within a batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    /// Filenames the generation step promised for this job, if it said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_files: Option<serde_json::Value>,
}

impl JobRecord {
    /// Build a record, replacing `/` in the position so it is safe as a path segment.
    pub fn new(
        company: impl Into<String>,
        position: impl AsRef<str>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            position: sanitize_position(position.as_ref()),
            description: description.into(),
            key: None,
            order: None,
            expected_files: None,
        }
    }
}

/// Replace path separators in a position title.
fn sanitize_position(position: &str) -> String {
    position.replace('/', "-")
}

fn unknown() -> String {
    "Unknown".to_string()
}
