//! Disk-backed download cache with ETag revalidation.
//!
//! Remote SPDX reference data (the license list, listed-license details)
//! changes rarely but is fetched constantly. Each cached URL owns two
//! sibling files under one cache directory: the raw content under a base64
//! key and a JSON metadata sidecar. Within the configured check interval a
//! hit is served straight from disk with no network traffic at all; past
//! it, the origin is revalidated with `If-None-Match` and a 304 merely
//! refreshes the sidecar.

mod fetch;
mod metadata;

pub use metadata::{format_timestamp, parse_timestamp, CacheMetadata, METADATA_SUFFIX};

use crate::config::Properties;
use crate::error::{Result, SpdxLibraryError};
use base64::prelude::{Engine as _, BASE64_URL_SAFE};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use url::Url;

/// Property enabling the cache. Off by default; a library must not write
/// to the filesystem behind an unsuspecting application.
pub const PROP_CACHE_ENABLED: &str = "download.cache.enabled";
/// Property holding the revalidation interval in seconds.
pub const PROP_CACHE_CHECK_INTERVAL: &str = "download.cache.check-interval-secs";

/// One day between revalidations unless configured otherwise.
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 86_400;

/// Cache directory name, shared with the Java SPDX library so both
/// implementations read and write one on-disk cache.
const CACHE_DIR_NAME: &str = "Spdx-Java-Library";

/// Construction-time cache settings.
///
/// There is no process-global cache state; independent instances with
/// separate roots can run side by side, which the tests rely on.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub check_interval_secs: u64,
    pub root: PathBuf,
}

impl CacheConfig {
    /// Resolves settings through the property chain and places the cache
    /// under the XDG cache home.
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let enabled = properties
            .get(PROP_CACHE_ENABLED, "false")
            .trim()
            .eq_ignore_ascii_case("true");
        let raw_interval = properties.get(PROP_CACHE_CHECK_INTERVAL, "86400");
        let check_interval_secs = match raw_interval.trim().parse::<u64>() {
            Ok(secs) => secs,
            Err(_) => {
                tracing::warn!(value = %raw_interval, "invalid cache check interval, using default");
                DEFAULT_CHECK_INTERVAL_SECS
            }
        };
        Ok(Self {
            enabled,
            check_interval_secs,
            root: default_cache_root()?,
        })
    }
}

/// `$XDG_CACHE_HOME/Spdx-Java-Library`, falling back to
/// `$HOME/.cache/Spdx-Java-Library`.
pub fn default_cache_root() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(CACHE_DIR_NAME)?;
    Ok(xdg_dirs.get_cache_home())
}

/// Readable handle onto fetched bytes: the cached content file, or the
/// in-memory body of a direct fetch when the cache is disabled.
#[derive(Debug)]
pub enum UrlReader {
    Cached(File),
    Direct(Cursor<Vec<u8>>),
}

impl Read for UrlReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            UrlReader::Cached(file) => file.read(buf),
            UrlReader::Direct(cursor) => cursor.read(buf),
        }
    }
}

/// The download cache.
pub struct DownloadCache {
    enabled: bool,
    check_interval_secs: u64,
    root: PathBuf,
}

impl DownloadCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            check_interval_secs: config.check_interval_secs,
            root: config.root,
        }
    }

    /// Cache configured entirely from the property chain.
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self::new(CacheConfig::from_properties(properties)?))
    }

    /// Stable on-disk key for `url`: URL-safe base64 of its string form.
    pub fn cache_key(url: &Url) -> String {
        BASE64_URL_SAFE.encode(url.as_str())
    }

    /// Path of the content file for `url`.
    pub fn content_path(&self, url: &Url) -> PathBuf {
        self.root.join(Self::cache_key(url))
    }

    /// Path of the metadata sidecar for `url`.
    pub fn metadata_path(&self, url: &Url) -> PathBuf {
        self.root
            .join(format!("{}{}", Self::cache_key(url), METADATA_SUFFIX))
    }

    /// Opens a readable stream over the content of `url`.
    ///
    /// Disabled caches fetch directly and touch no disk. Otherwise a
    /// complete, fresh entry is served from disk; a stale entry is
    /// revalidated against the origin first; and a missing or broken entry
    /// is downloaded in full. `restrict_redirects` confines any redirect to
    /// the trusted SPDX hosts.
    pub fn open_url(&self, url: &Url, restrict_redirects: bool) -> Result<UrlReader> {
        if !self.enabled {
            let fetched = fetch::fetch(url, restrict_redirects)?;
            return Ok(UrlReader::Direct(Cursor::new(fetched.body)));
        }
        let content_path = self.content_path(url);
        let metadata_path = self.metadata_path(url);
        if !content_path.is_file() || !metadata_path.is_file() {
            tracing::debug!(url = %url, "cache miss");
            return self.cache_miss(url, restrict_redirects, &content_path, &metadata_path);
        }
        self.check_cache(url, restrict_redirects, &content_path, &metadata_path)
    }

    /// Removes every cache entry, leaving an empty cache directory.
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|e| SpdxLibraryError::io(&self.root, e))?;
        }
        fs::create_dir_all(&self.root).map_err(|e| SpdxLibraryError::io(&self.root, e))?;
        Ok(())
    }

    /// Full download: fetch, persist content and a fresh sidecar, then
    /// serve from disk.
    fn cache_miss(
        &self,
        url: &Url,
        restrict_redirects: bool,
        content_path: &Path,
        metadata_path: &Path,
    ) -> Result<UrlReader> {
        let fetched = fetch::fetch(url, restrict_redirects)?;
        fs::create_dir_all(&self.root).map_err(|e| SpdxLibraryError::io(&self.root, e))?;
        write_atomic(content_path, &fetched.body)?;
        let now = format_timestamp(Utc::now());
        let metadata = CacheMetadata {
            etag: fetched.etag.unwrap_or_default(),
            downloaded_at: now.clone(),
            last_checked: now,
            source_url: url.to_string(),
        };
        metadata.write(metadata_path)?;
        open_cached(content_path)
    }

    /// Entry exists on disk; decide between serving it, revalidating it and
    /// re-downloading it.
    fn check_cache(
        &self,
        url: &Url,
        restrict_redirects: bool,
        content_path: &Path,
        metadata_path: &Path,
    ) -> Result<UrlReader> {
        let metadata = match CacheMetadata::read(metadata_path) {
            Some(metadata) => metadata,
            None => return self.cache_miss(url, restrict_redirects, content_path, metadata_path),
        };
        let now = Utc::now();
        let age = match metadata.age_seconds(now) {
            Some(age) => age,
            None => {
                tracing::warn!(url = %url, "unparseable lastChecked timestamp, treating as miss");
                return self.cache_miss(url, restrict_redirects, content_path, metadata_path);
            }
        };
        if age <= self.check_interval_secs as i64 {
            tracing::debug!(url = %url, age, "cache hit");
            return open_cached(content_path);
        }
        if metadata.etag.is_empty() {
            // No stored validator, so a conditional request cannot help.
            return self.cache_miss(url, restrict_redirects, content_path, metadata_path);
        }
        match fetch::conditional_status(url, &metadata.etag) {
            Ok(304) => {
                tracing::debug!(url = %url, "revalidated, content unchanged");
                let refreshed = CacheMetadata {
                    last_checked: format_timestamp(now),
                    ..metadata
                };
                refreshed.write(metadata_path)?;
                open_cached(content_path)
            }
            Ok(status) => {
                tracing::debug!(url = %url, status, "content changed, re-downloading");
                self.cache_miss(url, restrict_redirects, content_path, metadata_path)
            }
            Err(err) => {
                // Revalidation must never take down a caller that already
                // holds content; serve stale instead.
                tracing::warn!(url = %url, error = %err, "revalidation failed, serving cached content");
                open_cached(content_path)
            }
        }
    }
}

fn open_cached(path: &Path) -> Result<UrlReader> {
    let file = File::open(path).map_err(|e| SpdxLibraryError::io(path, e))?;
    Ok(UrlReader::Cached(file))
}

/// Writes through a `.part` sibling renamed into place, so a concurrent
/// reader never observes a half-written file.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);
    fs::write(&part, data).map_err(|e| SpdxLibraryError::io(&part, e))?;
    fs::rename(&part, path).map_err(|e| SpdxLibraryError::io(path, e))?;
    Ok(())
}
