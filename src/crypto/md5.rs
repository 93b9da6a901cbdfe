//! MD5 digest.
//!
//! PDF Spec: Section 7.6.3.3 - every key derivation step of the RC4 handler
//! hashes with MD5.

use ::md5::{Digest, Md5};

/// Length of an MD5 digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Compute the MD5 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Md5::digest(data).into()
}

/// Compute the MD5 digest of several slices as if they were concatenated.
pub fn digest_parts(parts: &[&[u8]]) -> [u8; DIGEST_LEN] {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
