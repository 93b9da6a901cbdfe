//! Cryptographic primitives for the Standard security handler.
//!
//! - MD5 digest (legacy, required by the RC4 key derivation algorithms)
//! - RC4 stream cipher (40 to 128-bit keys)
//! - Hex codec for identifiers and key material
//!
//! None of these carry security claims beyond PDF compatibility. MD5 and RC4
//! are only here because revision 3 of the Standard handler is built on them.

pub mod hex;
pub mod md5;
pub mod rc4;

pub use self::hex::{bytes_to_hex, hex_to_bytes};
pub use self::rc4::{rc4_crypt, Rc4};
