//! Per-file checksum generation.
//!
//! Verification codes hash every file in a package, so files are read in
//! fixed-size chunks and never held in memory whole.

use crate::error::{Result, SpdxLibraryError};
use crate::model::ChecksumAlgorithm;
use sha1::{Digest, Sha1};
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Source of per-file checksums for verification code generation.
///
/// Injected into [`crate::verification::VerificationCodeGenerator`] so the
/// algorithm, or the whole file-reading strategy in tests, can be swapped.
pub trait FileChecksumGenerator {
    /// Checksum of the file at `path` as lowercase hex.
    fn file_checksum(&self, path: &Path) -> Result<String>;
}

/// Chunked-read checksum generator backed by a fixed algorithm.
#[derive(Debug, Clone, Copy)]
pub struct StreamingChecksumGenerator {
    algorithm: ChecksumAlgorithm,
}

impl StreamingChecksumGenerator {
    /// Creates a generator for `algorithm`.
    ///
    /// Algorithms without a digest implementation are rejected here rather
    /// than on the first file read.
    pub fn new(algorithm: ChecksumAlgorithm) -> Result<Self> {
        if !is_supported(algorithm) {
            return Err(SpdxLibraryError::UnsupportedAlgorithm(algorithm));
        }
        Ok(Self { algorithm })
    }

    /// The SHA-1 generator mandated by the SPDX specification.
    pub fn sha1() -> Self {
        Self {
            algorithm: ChecksumAlgorithm::Sha1,
        }
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }
}

impl FileChecksumGenerator for StreamingChecksumGenerator {
    fn file_checksum(&self, path: &Path) -> Result<String> {
        let mut file = File::open(path).map_err(|e| SpdxLibraryError::io(path, e))?;
        match self.algorithm {
            ChecksumAlgorithm::Sha1 => hash_reader::<Sha1>(&mut file, path),
            ChecksumAlgorithm::Sha224 => hash_reader::<Sha224>(&mut file, path),
            ChecksumAlgorithm::Sha256 => hash_reader::<Sha256>(&mut file, path),
            ChecksumAlgorithm::Sha384 => hash_reader::<Sha384>(&mut file, path),
            ChecksumAlgorithm::Sha512 => hash_reader::<Sha512>(&mut file, path),
            other => Err(SpdxLibraryError::UnsupportedAlgorithm(other)),
        }
    }
}

fn is_supported(algorithm: ChecksumAlgorithm) -> bool {
    matches!(
        algorithm,
        ChecksumAlgorithm::Sha1
            | ChecksumAlgorithm::Sha224
            | ChecksumAlgorithm::Sha256
            | ChecksumAlgorithm::Sha384
            | ChecksumAlgorithm::Sha512
    )
}

fn hash_reader<D: Digest>(reader: &mut impl Read, path: &Path) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| SpdxLibraryError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn sha1_of_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let sum = StreamingChecksumGenerator::sha1()
            .file_checksum(file.path())
            .unwrap();
        assert_eq!(sum, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn sha1_of_known_content() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello\n").unwrap();
        let sum = StreamingChecksumGenerator::sha1()
            .file_checksum(file.path())
            .unwrap();
        assert_eq!(sum, "f572d396fae9206628714fb2ce00f72e94f2258f");
    }

    #[test]
    fn sha256_generator_is_selectable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello\n").unwrap();
        let generator = StreamingChecksumGenerator::new(ChecksumAlgorithm::Sha256).unwrap();
        assert_eq!(generator.algorithm(), ChecksumAlgorithm::Sha256);
        let sum = generator.file_checksum(file.path()).unwrap();
        assert_eq!(
            sum,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn content_larger_than_one_chunk() {
        let mut file = NamedTempFile::new().unwrap();
        // Three full chunks plus a tail.
        let data = vec![0x5au8; BUF_SIZE * 3 + 17];
        file.write_all(&data).unwrap();
        let streamed = StreamingChecksumGenerator::sha1()
            .file_checksum(file.path())
            .unwrap();
        let whole = hex::encode(Sha1::digest(&data));
        assert_eq!(streamed, whole);
    }

    #[test]
    fn unsupported_algorithm_is_rejected_at_construction() {
        let err = StreamingChecksumGenerator::new(ChecksumAlgorithm::Md5).unwrap_err();
        assert!(matches!(
            err,
            SpdxLibraryError::UnsupportedAlgorithm(ChecksumAlgorithm::Md5)
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = StreamingChecksumGenerator::sha1()
            .file_checksum(Path::new("/no/such/file.bin"))
            .unwrap_err();
        match err {
            SpdxLibraryError::Io { path, .. } => assert!(path.contains("no/such/file.bin")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
