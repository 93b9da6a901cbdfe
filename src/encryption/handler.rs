//! Standard security handler for protecting PDF documents.
//!
//! This module provides the [`SecurityHandler`], which holds the O and U
//! values and the file encryption key for one document, and
//! [`encrypt_document`], which drives the in-memory encryption stages.

use super::algorithms;
use super::file_id::{resolve_file_id, FileId};
use super::random::RandomSource;
use super::write_handler::{EncryptionWriteHandler, TraversalStats};
use super::{EncryptDict, KEY_LENGTH};
use crate::config::EncryptionConfig;
use crate::error::Result;
use lopdf::{Document, Object, ObjectId};
use zeroize::Zeroizing;

/// Key material of the Standard security handler for one document.
pub struct SecurityHandler {
    /// File identifier the keys are bound to
    file_id: FileId,
    /// Owner password hash (O)
    owner_key: [u8; 32],
    /// User password hash (U)
    user_key: [u8; 32],
    /// File encryption key, wiped on drop
    encryption_key: Zeroizing<[u8; KEY_LENGTH]>,
    /// User access permissions (P)
    permissions: i32,
}

impl SecurityHandler {
    /// Derive O, the file encryption key and U for `config` and `file_id`.
    ///
    /// PDF Spec: Algorithms 3, 2 and 5, in that order
    pub fn new(config: &EncryptionConfig, file_id: FileId) -> Result<Self> {
        let user_password = config.user_password.as_bytes();
        let permissions = config.permissions();

        let owner_key =
            algorithms::compute_owner_key(config.owner_password().as_bytes(), user_password)?;
        let encryption_key = algorithms::compute_encryption_key(
            user_password,
            &owner_key,
            permissions,
            file_id.as_bytes(),
        );
        let user_key = algorithms::compute_user_key(encryption_key.as_slice(), file_id.as_bytes())?;

        Ok(Self {
            file_id,
            owner_key,
            user_key,
            encryption_key,
            permissions,
        })
    }

    /// File identifier the keys were derived for.
    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    /// The /O value.
    pub fn owner_key(&self) -> &[u8; 32] {
        &self.owner_key
    }

    /// The /U value.
    pub fn user_key(&self) -> &[u8; 32] {
        &self.user_key
    }

    /// The file encryption key.
    pub fn encryption_key(&self) -> &[u8] {
        self.encryption_key.as_slice()
    }

    /// The /P value.
    pub fn permissions(&self) -> i32 {
        self.permissions
    }

    /// Encryption dictionary describing this handler.
    pub fn encrypt_dict(&self) -> EncryptDict {
        EncryptDict::rc4_128(&self.owner_key, &self.user_key, self.permissions)
    }

    /// Object encryptor bound to this handler's key.
    pub fn write_handler(&self) -> EncryptionWriteHandler<'_> {
        EncryptionWriteHandler::new(self.encryption_key())
    }

    /// Check whether `password` opens a document protected by this handler.
    pub fn authenticate(&self, password: &str) -> Result<bool> {
        let key = algorithms::authenticate_user_password(
            password.as_bytes(),
            &self.user_key,
            &self.owner_key,
            self.permissions,
            self.file_id.as_bytes(),
        )?;
        Ok(key.is_some())
    }
}

impl std::fmt::Debug for SecurityHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityHandler")
            .field("file_id", &self.file_id)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// Summary of one [`encrypt_document`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionReport {
    /// File identifier the keys are bound to
    pub file_id: FileId,
    /// Object id of the registered encryption dictionary
    pub encrypt_ref: ObjectId,
    /// Indirect objects encrypted
    pub objects_encrypted: usize,
    /// Indirect objects skipped as security handler dictionaries
    pub objects_skipped: usize,
    /// Strings replaced with ciphertext
    pub strings_encrypted: usize,
    /// Stream payloads replaced with ciphertext
    pub streams_encrypted: usize,
}

impl EncryptionReport {
    fn new(file_id: FileId, encrypt_ref: ObjectId, stats: TraversalStats) -> Self {
        Self {
            file_id,
            encrypt_ref,
            objects_encrypted: stats.objects_encrypted,
            objects_skipped: stats.objects_skipped,
            strings_encrypted: stats.strings_encrypted,
            streams_encrypted: stats.streams_encrypted,
        }
    }
}

/// Encrypt `doc` in place with the Standard security handler (RC4 128-bit).
///
/// Resolves the file identifier, derives the keys, encrypts every string and
/// stream, then registers the encryption dictionary and points the trailer's
/// `/Encrypt` at it. The document is not serialized.
///
/// Errors are returned unwrapped; on error `doc` may be partially encrypted
/// and should be discarded.
pub fn encrypt_document<R: RandomSource + ?Sized>(
    doc: &mut Document,
    config: &EncryptionConfig,
    rng: &mut R,
) -> Result<EncryptionReport> {
    let file_id = resolve_file_id(doc, rng)?;
    let handler = SecurityHandler::new(config, file_id)?;

    let stats = handler.write_handler().encrypt_objects(&mut doc.objects)?;

    // Added after the traversal so the dictionary itself stays plaintext
    let encrypt_ref = doc.add_object(Object::Dictionary(handler.encrypt_dict().to_dictionary()));
    doc.trailer.set("Encrypt", Object::Reference(encrypt_ref));

    log::info!(
        "Encrypted PDF with RC4 128-bit (V=2, R=3): {} objects, {} strings, {} streams",
        stats.objects_encrypted,
        stats.strings_encrypted,
        stats.streams_encrypted
    );

    Ok(EncryptionReport::new(handler.file_id().clone(), encrypt_ref, stats))
}
