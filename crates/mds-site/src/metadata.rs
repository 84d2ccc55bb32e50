//! Document metadata embedded in a leading HTML comment.
//!
//! ```markdown
//! <!--
//! {
//!   "tags": ["rust"],
//!   "creation_date": "2024-03-01T10:00:00Z",
//!   "author": "Jane"
//! }
//! -->
//! # Post title
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::MetadataError;

const OPEN: &[u8] = b"<!--";
const CLOSE: &[u8] = b"-->";

/// Unix timestamp of `0001-01-01T00:00:00Z`, read as "no date".
const ZERO_INSTANT: i64 = -62_135_596_800;

/// Per-document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, deserialize_with = "optional_instant")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "optional_instant")]
    pub last_modification_date: Option<DateTime<Utc>>,
}

fn optional_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let instant = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(instant.filter(|t| t.timestamp() != ZERO_INSTANT))
}

/// Extract metadata from the start of a document.
///
/// Returns `Ok(None)` when the document does not start with `<!--`.
///
/// # Errors
///
/// [`MetadataError::Unterminated`] if the comment is never closed and
/// [`MetadataError::Parse`] if its body is not a metadata object.
pub fn extract_metadata(bytes: &[u8]) -> Result<Option<Metadata>, MetadataError> {
    let Some(rest) = bytes.strip_prefix(OPEN) else {
        return Ok(None);
    };
    let end = rest
        .windows(CLOSE.len())
        .position(|w| w == CLOSE)
        .ok_or(MetadataError::Unterminated)?;
    let body = rest[..end].trim_ascii();
    Ok(Some(serde_json::from_slice(body)?))
}
