//! SPDX support library: package verification codes and cached retrieval of
//! remote SPDX reference data.
//!
//! The two load-bearing pieces are [`verification::VerificationCodeGenerator`],
//! which fingerprints a package's file contents into a single digest, and
//! [`cache::DownloadCache`], an ETag-revalidated disk cache for the license
//! list and related data. The remaining modules are the seams those two
//! need: SPDX value types, a pluggable object store, per-file checksum
//! generation, the configuration property chain and the library error type.

pub mod cache;
pub mod checksum;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod verification;

pub use error::{Result, SpdxLibraryError};
