//! RC4 stream cipher for PDF.
//!
//! RC4 is the cipher of the Standard security handler for V=1/V=2. It is
//! cryptographically weak by modern standards and kept for reader
//! compatibility only.
//!
//! PDF Spec: Section 7.6.2 - General Encryption Algorithm
//!
//! A cipher instance is consumed by [`Rc4::process`], so one keystream is
//! never applied to two payloads.

use crate::error::{Error, Result};

/// Longest key RC4 can schedule. PDF itself only uses 5 to 16 bytes.
pub const MAX_KEY_LEN: usize = 256;

/// RC4 cipher state.
pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Initialize the cipher with a key (key-scheduling algorithm).
    ///
    /// PDF Spec: RC4 key length is 5-16 bytes (40-128 bits). Any non-empty
    /// key up to 256 bytes is accepted so the generic test vectors apply.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(Error::InvalidKeyLength(key.len()));
        }

        let mut s = [0u8; 256];
        for (i, val) in s.iter_mut().enumerate() {
            *val = i as u8;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        Ok(Self { s, i: 0, j: 0 })
    }

    /// Generate the next byte of keystream.
    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }

    fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }

    /// Encrypt or decrypt `data`, consuming the cipher.
    ///
    /// RC4 is symmetric, so both directions are the same operation. The
    /// output has the same length as the input.
    pub fn process(mut self, data: &[u8]) -> Vec<u8> {
        let mut result = data.to_vec();
        self.apply_keystream(&mut result);
        result
    }
}

/// Encrypt or decrypt data using a fresh RC4 instance.
///
/// # Arguments
///
/// * `key` - The encryption key (5-16 bytes for PDF)
/// * `data` - The data to encrypt/decrypt
pub fn rc4_crypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Ok(Rc4::new(key)?.process(data))
}
