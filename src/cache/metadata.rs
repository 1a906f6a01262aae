//! Cache entry metadata sidecars.
//!
//! Every cached URL keeps a JSON sidecar next to its content file holding
//! the origin's ETag, when the content was downloaded and when it was last
//! checked against the origin. Timestamps are ISO-8601 UTC with millisecond
//! precision and a literal `Z` suffix; the field names match the sidecars
//! written by other SPDX library implementations sharing the cache
//! directory.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Suffix appended to a cache key to name its metadata sidecar.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// Sidecar contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Verbatim ETag from the origin, quotes and weak prefix included;
    /// empty when the origin sent none.
    #[serde(rename = "eTag", default)]
    pub etag: String,
    #[serde(rename = "downloadedAt")]
    pub downloaded_at: String,
    #[serde(rename = "lastChecked")]
    pub last_checked: String,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
}

impl CacheMetadata {
    /// Reads and parses a sidecar. `None` when the file is missing or does
    /// not parse; callers treat both as a cache miss.
    pub(crate) fn read(path: &Path) -> Option<Self> {
        let data = fs::read(path).ok()?;
        match serde_json::from_slice(&data) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "discarding corrupt cache metadata");
                None
            }
        }
    }

    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        super::write_atomic(path, &data)
    }

    /// Seconds elapsed since `lastChecked`, absolute so clock skew in
    /// either direction reads as a small age. `None` when the stored
    /// timestamp does not parse.
    pub(crate) fn age_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        let last = parse_timestamp(&self.last_checked)?;
        Some((now - last).num_seconds().abs())
    }
}

/// Formats a timestamp the way sidecars store them, e.g.
/// `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a sidecar timestamp back into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
