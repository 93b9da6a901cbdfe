//! PDF encryption algorithms.
//!
//! This module implements the key derivation algorithms of the Standard
//! security handler, revision 3 (128-bit RC4).
//!
//! PDF Spec: Section 7.6.3 - Standard Security Handler

use super::KEY_LENGTH;
use crate::crypto::md5;
use crate::crypto::rc4::Rc4;
use crate::error::Result;
use zeroize::Zeroizing;

/// Padding string used in PDF encryption (32 bytes).
///
/// PDF Spec: Algorithm 2, step 1
pub const PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Number of extra MD5 passes for R>=3.
const HASH_ROUNDS: usize = 50;

/// Pad or truncate a password to 32 bytes using the standard padding.
///
/// PDF Spec: Algorithm 2, step 1
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    let pass_len = password.len().min(32);
    padded[..pass_len].copy_from_slice(&password[..pass_len]);
    padded[pass_len..].copy_from_slice(&PADDING[..(32 - pass_len)]);
    padded
}

/// Compute the owner password hash, the /O value (Algorithm 3).
///
/// PDF Spec: Section 7.6.3.4 - Algorithm 3: Computing the O value
///
/// `owner_password` is the owner password, or the user password when the
/// caller has no distinct owner password. The result does not depend on the
/// file identifier.
pub fn compute_owner_key(owner_password: &[u8], user_password: &[u8]) -> Result<[u8; 32]> {
    // Steps a-c: MD5 of the padded owner password
    let mut hash = md5::digest(&pad_password(owner_password));

    // Step d: 50 additional MD5 iterations over the full digest
    for _ in 0..HASH_ROUNDS {
        hash = md5::digest(&hash);
    }

    // Steps e-g: RC4 the padded user password, then 19 more times with
    // XOR'd keys. Round 0 XORs with zero, i.e. uses the digest as-is.
    let mut result = pad_password(user_password).to_vec();
    for i in 0..20u8 {
        let mut round_key = hash;
        for byte in round_key.iter_mut() {
            *byte ^= i;
        }
        result = Rc4::new(&round_key[..KEY_LENGTH])?.process(&result);
    }

    let mut owner_key = [0u8; 32];
    owner_key.copy_from_slice(&result);
    Ok(owner_key)
}

/// Compute the file encryption key (Algorithm 2).
///
/// PDF Spec: Section 7.6.3.3 - Algorithm 2: Computing an encryption key
///
/// # Arguments
///
/// * `user_password` - User password (padded or truncated to 32 bytes)
/// * `owner_key` - 32-byte /O value
/// * `permissions` - User access permissions (P field)
/// * `file_id` - First element of file identifier array
pub fn compute_encryption_key(
    user_password: &[u8],
    owner_key: &[u8],
    permissions: i32,
    file_id: &[u8],
) -> Zeroizing<[u8; KEY_LENGTH]> {
    let padded_password = Zeroizing::new(pad_password(user_password));

    // Steps b-f: padded password, O, P as 32-bit little-endian, file ID
    let mut hash = Zeroizing::new(md5::digest_parts(&[
        padded_password.as_slice(),
        owner_key,
        &permissions.to_le_bytes(),
        file_id,
    ]));

    // Step h: 50 additional MD5 iterations on the first n bytes
    for _ in 0..HASH_ROUNDS {
        *hash = md5::digest(&hash[..KEY_LENGTH]);
    }

    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    key.copy_from_slice(&hash[..KEY_LENGTH]);
    key
}

/// Compute the user password hash, the /U value (Algorithm 5).
///
/// PDF Spec: Section 7.6.3.4 - Algorithm 5: Computing the U value (R>=3)
pub fn compute_user_key(encryption_key: &[u8], file_id: &[u8]) -> Result<[u8; 32]> {
    // Steps b-c: MD5 of the padding string and the file ID
    let hash = md5::digest_parts(&[&PADDING, file_id]);

    // Step d: RC4 with the file encryption key
    let mut result = Rc4::new(encryption_key)?.process(&hash);

    // Step e: 19 more passes, key XOR'd with the round number
    for i in 1..=19u8 {
        let round_key: Zeroizing<Vec<u8>> =
            Zeroizing::new(encryption_key.iter().map(|b| b ^ i).collect());
        result = Rc4::new(&round_key)?.process(&result);
    }

    // Step f: append 16 arbitrary bytes (zeros)
    let mut user_key = [0u8; 32];
    user_key[..16].copy_from_slice(&result);
    Ok(user_key)
}

/// Derive the object-specific RC4 key (Algorithm 1).
///
/// PDF Spec: Section 7.6.2 - Algorithm 1, steps a-d
///
/// The key is extended with the low 3 bytes of the object number and the low
/// 2 bytes of the generation number, both little-endian, hashed with MD5 and
/// cut to `min(n + 5, 16)` bytes.
pub fn object_key(encryption_key: &[u8], obj_num: u32, gen_num: u16) -> Zeroizing<Vec<u8>> {
    let hash = Zeroizing::new(md5::digest_parts(&[
        encryption_key,
        &obj_num.to_le_bytes()[..3],
        &gen_num.to_le_bytes(),
    ]));

    let key_length = (encryption_key.len() + 5).min(16);
    Zeroizing::new(hash[..key_length].to_vec())
}

/// Encrypt a string or stream payload belonging to object `obj_num gen_num`.
///
/// RC4 is symmetric, so the same call decrypts.
pub fn encrypt_object(
    data: &[u8],
    obj_num: u32,
    gen_num: u16,
    encryption_key: &[u8],
) -> Result<Vec<u8>> {
    let key = object_key(encryption_key, obj_num, gen_num);
    Ok(Rc4::new(&key)?.process(data))
}

/// Authenticate the user password (Algorithm 6).
///
/// PDF Spec: Section 7.6.3.4 - Algorithm 6: Authenticating the user password
///
/// Returns the file encryption key if the password matches the /U value.
pub fn authenticate_user_password(
    password: &[u8],
    user_key: &[u8],
    owner_key: &[u8],
    permissions: i32,
    file_id: &[u8],
) -> Result<Option<Zeroizing<[u8; KEY_LENGTH]>>> {
    if user_key.len() < 16 {
        return Ok(None);
    }

    let key = compute_encryption_key(password, owner_key, permissions, file_id);
    let expected_user_key = compute_user_key(key.as_slice(), file_id)?;

    // R>=3: only the first 16 bytes are significant
    if constant_time_compare(&user_key[..16], &expected_user_key[..16]) {
        Ok(Some(key))
    } else {
        Ok(None)
    }
}

/// Constant-time comparison to prevent timing attacks.
///
/// Returns true if the slices are equal.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
