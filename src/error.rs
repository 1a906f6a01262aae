//! Library error type.

use crate::model::ChecksumAlgorithm;
use std::path::Path;
use thiserror::Error;

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum SpdxLibraryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u32 },

    #[error("redirect from {url} carried no Location header")]
    RedirectMissingLocation { url: String },

    #[error("redirect target {target} is not a valid absolute URL: {source}")]
    RedirectTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("redirect target {target} is not an http or https URL")]
    RedirectScheme { target: String },

    #[error("redirect to untrusted host {host}")]
    RedirectUntrustedHost { host: String },

    #[error("checksum algorithm {0} is not supported")]
    UnsupportedAlgorithm(ChecksumAlgorithm),

    #[error("file {file_name} has no SHA-1 checksum")]
    MissingSha1Checksum { file_name: String },

    #[error("no stored object {id}")]
    ObjectNotFound { id: String },

    #[error("property {property} of {id} holds a single value, not a list")]
    PropertyNotList { id: String, property: String },

    #[error("XDG base directory lookup failed: {0}")]
    BaseDirectories(#[from] xdg::BaseDirectoriesError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SpdxLibraryError {
    /// I/O error tagged with the path it happened on.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        SpdxLibraryError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Transfer-level error tagged with the URL being fetched.
    pub(crate) fn network(url: &url::Url, source: curl::Error) -> Self {
        SpdxLibraryError::Network {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpdxLibraryError>;
