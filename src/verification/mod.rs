//! Package verification code generation.
//!
//! A verification code fingerprints the complete file contents of a
//! package: per-file checksums are sorted and hashed into one SHA-1, so the
//! code is independent of traversal order and changes whenever any file
//! content changes. File paths never enter the digest; only which files are
//! excluded is recorded alongside it.

mod path;
mod walk;

pub use path::normalize_file_path;

use crate::checksum::{FileChecksumGenerator, StreamingChecksumGenerator};
use crate::error::{Result, SpdxLibraryError};
use crate::model::{ChecksumAlgorithm, SpdxFile, VerificationCode};
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Generates SPDX package verification codes.
///
/// The per-file checksum source is injected at construction. The combining
/// digest is always SHA-1; the SPDX 2.3 specification fixes it regardless
/// of the per-file algorithm.
pub struct VerificationCodeGenerator<G = StreamingChecksumGenerator> {
    checksum_generator: G,
}

impl VerificationCodeGenerator<StreamingChecksumGenerator> {
    /// Generator with streaming SHA-1 per-file checksums, the standard
    /// configuration.
    pub fn sha1() -> Self {
        Self::new(StreamingChecksumGenerator::sha1())
    }
}

impl<G: FileChecksumGenerator> VerificationCodeGenerator<G> {
    pub fn new(checksum_generator: G) -> Self {
        Self { checksum_generator }
    }

    /// Computes the verification code for the directory tree rooted at
    /// `root`, checksumming every file on the fly.
    ///
    /// `skipped_files` are left out of the digest; each entry is taken
    /// relative to `root` when possible and normalized, and the normalized
    /// names are reported in the result. A `root` that cannot be listed
    /// yields the code of an empty file set, per the walk's leniency.
    pub fn generate_from_directory(
        &self,
        root: &Path,
        skipped_files: &[PathBuf],
    ) -> Result<VerificationCode> {
        let mut skip_set = HashSet::new();
        for skipped in skipped_files {
            let relative = skipped.strip_prefix(root).unwrap_or(skipped);
            skip_set.insert(normalize_file_path(&relative.to_string_lossy()));
        }
        let mut checksums = Vec::new();
        walk::collect_checksums(
            &self.checksum_generator,
            root,
            root,
            &skip_set,
            &mut checksums,
        )?;
        Ok(combine(checksums, skip_set.into_iter().collect()))
    }

    /// Computes the verification code from already-checksummed file
    /// descriptions, without touching the filesystem.
    ///
    /// Files whose name appears in `skipped_paths` are left out, as are
    /// files with no name at all. Every remaining file must carry a SHA-1
    /// checksum; its stored value is used verbatim. `skipped_paths` entries
    /// are compared literally against stored file names and echoed into the
    /// result, duplicates included.
    pub fn generate_from_files(
        &self,
        files: &[SpdxFile],
        skipped_paths: &[String],
    ) -> Result<VerificationCode> {
        let skip_set: HashSet<&str> = skipped_paths.iter().map(String::as_str).collect();
        let mut checksums = Vec::new();
        for file in files {
            let name = match file.file_name.as_deref() {
                Some(name) => name,
                None => continue,
            };
            if skip_set.contains(name) {
                continue;
            }
            let value = file.checksum_value(ChecksumAlgorithm::Sha1).ok_or_else(|| {
                SpdxLibraryError::MissingSha1Checksum {
                    file_name: name.to_string(),
                }
            })?;
            checksums.push(value.to_string());
        }
        Ok(combine(checksums, skipped_paths.to_vec()))
    }
}

/// Shared combination step: ascending lexicographic sort, SHA-1 over the
/// concatenated UTF-8 checksum bytes, lowercase hex out.
fn combine(mut checksums: Vec<String>, mut excluded: Vec<String>) -> VerificationCode {
    checksums.sort();
    let mut digest = Sha1::new();
    for checksum in &checksums {
        digest.update(checksum.as_bytes());
    }
    excluded.sort();
    VerificationCode {
        value: hex::encode(digest.finalize()),
        excluded_file_names: excluded,
    }
}
