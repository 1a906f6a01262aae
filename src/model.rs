//! SPDX model value types used by verification code generation.
//!
//! Serialization names follow the SPDX 2.3 JSON schema so these types can be
//! embedded directly in document serializers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash algorithms recognized by the SPDX 2.3 schema.
///
/// Only a subset has a digest implementation behind it; see
/// [`crate::checksum::StreamingChecksumGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA224")]
    Sha224,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA384")]
    Sha384,
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    #[serde(rename = "BLAKE2b-256")]
    Blake2b256,
    #[serde(rename = "BLAKE2b-384")]
    Blake2b384,
    #[serde(rename = "BLAKE2b-512")]
    Blake2b512,
    #[serde(rename = "BLAKE3")]
    Blake3,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "ADLER32")]
    Adler32,
}

impl ChecksumAlgorithm {
    /// Schema tag for the algorithm, e.g. `SHA1`.
    pub fn tag(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha224 => "SHA224",
            ChecksumAlgorithm::Sha256 => "SHA256",
            ChecksumAlgorithm::Sha384 => "SHA384",
            ChecksumAlgorithm::Sha512 => "SHA512",
            ChecksumAlgorithm::Sha3_256 => "SHA3-256",
            ChecksumAlgorithm::Sha3_384 => "SHA3-384",
            ChecksumAlgorithm::Sha3_512 => "SHA3-512",
            ChecksumAlgorithm::Blake2b256 => "BLAKE2b-256",
            ChecksumAlgorithm::Blake2b384 => "BLAKE2b-384",
            ChecksumAlgorithm::Blake2b512 => "BLAKE2b-512",
            ChecksumAlgorithm::Blake3 => "BLAKE3",
            ChecksumAlgorithm::Md5 => "MD5",
            ChecksumAlgorithm::Adler32 => "ADLER32",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single checksum attached to a file or package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    /// Lowercase hex digest.
    pub checksum_value: String,
}

impl Checksum {
    pub fn new(algorithm: ChecksumAlgorithm, checksum_value: impl Into<String>) -> Self {
        Self {
            algorithm,
            checksum_value: checksum_value.into(),
        }
    }
}

/// A file described by an SPDX document.
///
/// Only the fields verification code generation reads are modeled here. The
/// file name is optional because documents in the wild omit it; nameless
/// files cannot participate in a verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxFile {
    pub file_name: Option<String>,
    #[serde(default)]
    pub checksums: Vec<Checksum>,
}

impl SpdxFile {
    pub fn new(file_name: impl Into<String>, checksums: Vec<Checksum>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            checksums,
        }
    }

    /// First stored checksum value for `algorithm`, if any.
    pub fn checksum_value(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        self.checksums
            .iter()
            .find(|c| c.algorithm == algorithm)
            .map(|c| c.checksum_value.as_str())
    }
}

/// An SPDX package verification code.
///
/// `value` is the lowercase hex SHA-1 over the sorted per-file checksums;
/// `excluded_file_names` lists the normalized paths left out of that digest,
/// sorted ascending. Codes are computed once per generation call and never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    #[serde(rename = "packageVerificationCodeValue")]
    pub value: String,
    #[serde(rename = "packageVerificationCodeExcludedFiles", default)]
    pub excluded_file_names: Vec<String>,
}
