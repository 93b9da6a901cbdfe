//! PDF encryption support.
//!
//! This module implements the Standard security handler, revision 3, according
//! to the PDF specification (ISO 32000-1:2008, Section 7.6):
//!
//! - RC4 with a 128-bit key (V=2, R=3, PDF 1.4+)
//! - Owner (O) and user (U) key computation from passwords
//! - Per-object key derivation and in-place encryption of strings and streams
//!
//! # Stages
//!
//! 1. Resolve the file identifier (trailer `/ID`, or a fresh random one)
//! 2. Derive O, the file encryption key, and U
//! 3. Encrypt every string and stream of every indirect object
//! 4. Register the encryption dictionary and link it from `/Encrypt`
//!
//! Serialization is left to [`crate::api`].
//!
//! # References
//!
//! - PDF Spec Section 7.6.2: Algorithm 1 (object keys)
//! - PDF Spec Section 7.6.3.3: Algorithms 2, 3 and 5

use crate::error::{Error, Result};
use lopdf::{Dictionary, Object, StringFormat};

pub mod algorithms;
mod file_id;
mod handler;
mod random;
mod write_handler;

pub use file_id::{resolve_file_id, FileId, FILE_ID_LEN};
pub use handler::{encrypt_document, EncryptionReport, SecurityHandler};
pub use random::{ClockRandom, OsRandom, RandomSource};
pub use write_handler::{is_standard_security_dict, EncryptionWriteHandler, TraversalStats};

/// Security handler name written to /Filter.
pub const FILTER_STANDARD: &[u8] = b"Standard";

/// Algorithm version (V): RC4 with key length > 40 bits.
pub const VERSION: i64 = 2;

/// Standard security handler revision (R).
pub const REVISION: i64 = 3;

/// File encryption key length in bits (Length).
pub const KEY_LENGTH_BITS: i64 = 128;

/// File encryption key length in bytes.
pub const KEY_LENGTH: usize = 16;

/// User access permissions (P): every bit set except the two low reserved bits.
///
/// `0xFFFFFFFC` read as a signed 32-bit integer, i.e. `-4`.
pub const PERMISSIONS: i32 = 0xFFFF_FFFCu32 as i32;

/// Dictionary keys that describe stream framing and stay in plaintext.
pub const PLAINTEXT_KEYS: [&[u8]; 3] = [b"Length", b"Filter", b"DecodeParms"];

/// PDF encryption dictionary (/Encrypt entry in trailer).
///
/// PDF Spec: Section 7.6.1 - General, Table 20 and Table 21
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptDict {
    /// Algorithm version (V)
    pub version: i64,
    /// Standard handler revision (R)
    pub revision: i64,
    /// Key length in bits (Length)
    pub length: i64,
    /// User access permissions (P)
    pub permissions: i32,
    /// Owner password hash (O): 32 bytes
    pub owner_key: Vec<u8>,
    /// User password hash (U): 32 bytes
    pub user_key: Vec<u8>,
}

impl EncryptDict {
    /// Build the RC4 128-bit dictionary for the given O and U values.
    pub fn rc4_128(owner_key: &[u8], user_key: &[u8], permissions: i32) -> Self {
        Self {
            version: VERSION,
            revision: REVISION,
            length: KEY_LENGTH_BITS,
            permissions,
            owner_key: owner_key.to_vec(),
            user_key: user_key.to_vec(),
        }
    }

    /// Convert to a `lopdf` dictionary ready for registration.
    ///
    /// O and U are written as hex strings.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(FILTER_STANDARD.to_vec()));
        dict.set("V", Object::Integer(self.version));
        dict.set("R", Object::Integer(self.revision));
        dict.set("Length", Object::Integer(self.length));
        dict.set("P", Object::Integer(i64::from(self.permissions)));
        dict.set(
            "O",
            Object::String(self.owner_key.clone(), StringFormat::Hexadecimal),
        );
        dict.set(
            "U",
            Object::String(self.user_key.clone(), StringFormat::Hexadecimal),
        );
        dict
    }

    /// Parse an encryption dictionary produced by this handler.
    ///
    /// PDF Spec: Section 7.6.1 - General
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let filter = match dict.get(b"Filter") {
            Ok(Object::Name(name)) => name.as_slice(),
            _ => {
                return Err(Error::Format(
                    "Encrypt dictionary missing /Filter".to_string(),
                ))
            },
        };
        if filter != FILTER_STANDARD {
            return Err(Error::Format(format!(
                "Unsupported security handler /{}",
                String::from_utf8_lossy(filter)
            )));
        }

        let integer = |key: &[u8]| -> Result<i64> {
            match dict.get(key) {
                Ok(Object::Integer(i)) => Ok(*i),
                _ => Err(Error::Format(format!(
                    "Encrypt dictionary missing /{}",
                    String::from_utf8_lossy(key)
                ))),
            }
        };
        let string = |key: &[u8]| -> Result<Vec<u8>> {
            match dict.get(key) {
                Ok(Object::String(bytes, _)) => Ok(bytes.clone()),
                _ => Err(Error::Format(format!(
                    "Encrypt dictionary missing /{}",
                    String::from_utf8_lossy(key)
                ))),
            }
        };

        let version = integer(b"V")?;
        let revision = integer(b"R")?;
        // Length is optional and defaults to 40 bits
        let length = integer(b"Length").unwrap_or(40);
        let permissions = integer(b"P")? as i32;

        Ok(Self {
            version,
            revision,
            length,
            permissions,
            owner_key: string(b"O")?,
            user_key: string(b"U")?,
        })
    }

    /// Key length in bytes. A negative /Length yields 0.
    pub fn key_length_bytes(&self) -> usize {
        usize::try_from(self.length / 8).unwrap_or(0)
    }
}
