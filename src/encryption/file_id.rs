//! File identifier (trailer /ID) resolution.
//!
//! PDF Spec: Section 14.4 - File Identifiers

use super::random::RandomSource;
use crate::crypto::hex::{bytes_to_hex, hex_to_bytes};
use crate::error::{Error, Result};
use lopdf::{Document, Object, StringFormat};

/// Length of a freshly generated file identifier.
pub const FILE_ID_LEN: usize = 16;

/// First element of the trailer /ID array.
#[derive(Clone, PartialEq, Eq)]
pub struct FileId(Vec<u8>);

impl FileId {
    /// Wrap existing identifier bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::Format("file identifier is empty".to_string()));
        }
        Ok(Self(bytes))
    }

    /// Parse a textual identifier such as `<0123...EF>`.
    pub fn from_hex(text: &str) -> Result<Self> {
        Self::from_bytes(hex_to_bytes(text)?)
    }

    /// Generate a new 16-byte identifier.
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = vec![0u8; FILE_ID_LEN];
        rng.fill_random(&mut bytes);
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// The two-element trailer array with both entries equal.
    pub fn to_trailer_array(&self) -> Object {
        Object::Array(vec![
            Object::String(self.0.clone(), StringFormat::Hexadecimal),
            Object::String(self.0.clone(), StringFormat::Hexadecimal),
        ])
    }
}

impl std::fmt::Debug for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FileId(<{}>)", self.to_hex())
    }
}

/// Read the first /ID element from the trailer, if any.
///
/// A missing /ID or an empty array yields `None`. Anything else that is not
/// a string is a format error.
fn read_trailer_id(doc: &Document) -> Result<Option<FileId>> {
    let id = match doc.trailer.get(b"ID") {
        Ok(obj) => obj,
        Err(_) => return Ok(None),
    };

    let id = match id {
        Object::Reference(id_ref) => doc.get_object(*id_ref).map_err(|e| {
            Error::Format(format!(
                "trailer /ID reference {} {} R is unreadable: {}",
                id_ref.0, id_ref.1, e
            ))
        })?,
        other => other,
    };

    let elements = match id {
        Object::Array(elements) => elements,
        _ => return Err(Error::Format("trailer /ID is not an array".to_string())),
    };

    match elements.first() {
        None => Ok(None),
        // lopdf has already decoded <...> hex strings to raw bytes
        Some(Object::String(bytes, _)) => FileId::from_bytes(bytes.clone()).map(Some),
        Some(_) => Err(Error::Format(
            "trailer /ID element is not a string".to_string(),
        )),
    }
}

/// Resolve the file identifier used for key derivation.
///
/// Uses the existing trailer /ID if present. Otherwise generates a new
/// 16-byte identifier and writes `[<id> <id>]` into the trailer before
/// returning, so every later stage sees the same value.
pub fn resolve_file_id<R: RandomSource + ?Sized>(doc: &mut Document, rng: &mut R) -> Result<FileId> {
    if let Some(file_id) = read_trailer_id(doc)? {
        log::debug!("Using existing file ID {}", file_id.to_hex());
        return Ok(file_id);
    }

    let file_id = FileId::generate(rng);
    doc.trailer.set("ID", file_id.to_trailer_array());
    log::debug!("Generated file ID {}", file_id.to_hex());
    Ok(file_id)
}
