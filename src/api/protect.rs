//! Load, encrypt and serialize PDF documents.

use crate::config::EncryptionConfig;
use crate::encryption::{encrypt_document, EncryptionReport, OsRandom, RandomSource};
use crate::error::{Error, Result};
use lopdf::xref::XrefType;
use lopdf::{Document, Object};
use std::path::Path;

/// Trailer entries that only describe the input's cross-reference layout.
const STALE_TRAILER_KEYS: [&[u8]; 8] = [
    b"Prev",
    b"XRefStm",
    b"Type",
    b"W",
    b"Index",
    b"Filter",
    b"DecodeParms",
    b"Length",
];

/// Encrypt PDF bytes with RC4 128-bit under the given passwords.
///
/// The owner password defaults to the user password. A missing file
/// identifier is generated from the OS random source.
///
/// # Errors
///
/// Every failure is reported as [`Error::EncryptionFailure`] wrapping the
/// underlying cause.
pub fn encrypt_pdf(
    pdf_bytes: &[u8],
    user_password: &str,
    owner_password: Option<&str>,
) -> Result<Vec<u8>> {
    let config = EncryptionConfig::new(user_password)
        .with_optional_owner_password(owner_password.map(str::to_owned));
    encrypt_pdf_with(pdf_bytes, &config, &mut OsRandom::new())
}

/// Encrypt PDF bytes using `rng` for a missing file identifier.
pub fn encrypt_pdf_with<R: RandomSource + ?Sized>(
    pdf_bytes: &[u8],
    config: &EncryptionConfig,
    rng: &mut R,
) -> Result<Vec<u8>> {
    encrypt_bytes(pdf_bytes, config, rng)
        .map(|(bytes, _)| bytes)
        .map_err(Error::encryption_failure)
}

/// Check whether PDF bytes already carry an `/Encrypt` trailer entry.
pub fn is_encrypted(pdf_bytes: &[u8]) -> Result<bool> {
    let doc = Document::load_mem(pdf_bytes)?;
    Ok(has_encrypt_entry(&doc))
}

/// Fail with [`Error::AlreadyEncrypted`] if `doc` is already protected.
pub fn ensure_unencrypted(doc: &Document) -> Result<()> {
    if has_encrypt_entry(doc) {
        return Err(Error::AlreadyEncrypted);
    }
    Ok(())
}

/// Encrypt the PDF at `input` and write the result to `output`.
///
/// Unlike [`encrypt_pdf`], this refuses input that is already encrypted.
/// IO and already-encrypted errors are returned as-is; failures of the
/// encryption itself are wrapped in [`Error::EncryptionFailure`].
pub fn protect_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &EncryptionConfig,
) -> Result<EncryptionReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let pdf_bytes = std::fs::read(input)?;
    let mut doc = load_document(&pdf_bytes).map_err(Error::encryption_failure)?;
    ensure_unencrypted(&doc)?;

    let report = encrypt_document(&mut doc, config, &mut OsRandom::new())
        .map_err(Error::encryption_failure)?;
    let protected = save_document(&mut doc).map_err(Error::encryption_failure)?;

    std::fs::write(output, &protected)?;
    log::info!(
        "Protected {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        protected.len()
    );
    Ok(report)
}

fn encrypt_bytes<R: RandomSource + ?Sized>(
    pdf_bytes: &[u8],
    config: &EncryptionConfig,
    rng: &mut R,
) -> Result<(Vec<u8>, EncryptionReport)> {
    let mut doc = load_document(pdf_bytes)?;
    let report = encrypt_document(&mut doc, config, rng)?;
    let bytes = save_document(&mut doc)?;
    Ok((bytes, report))
}

fn has_encrypt_entry(doc: &Document) -> bool {
    doc.trailer.get(b"Encrypt").is_ok()
}

/// Load a document and drop cross-reference and object streams.
///
/// `lopdf` has already unpacked their contents into the object table, and
/// the output is written with a classic cross-reference table.
fn load_document(pdf_bytes: &[u8]) -> Result<Document> {
    let mut doc = Document::load_mem(pdf_bytes)?;

    let before = doc.objects.len();
    doc.objects.retain(|_, object| !is_layout_stream(object));
    let dropped = before - doc.objects.len();
    if dropped > 0 {
        log::debug!("Dropped {} cross-reference/object streams", dropped);
    }

    for key in STALE_TRAILER_KEYS {
        doc.trailer.remove(key);
    }

    log::debug!("Loaded PDF {} with {} objects", doc.version, doc.objects.len());
    Ok(doc)
}

fn is_layout_stream(object: &Object) -> bool {
    match object {
        Object::Stream(stream) => matches!(
            stream.dict.get(b"Type"),
            Ok(Object::Name(name)) if name.as_slice() == b"XRef" || name.as_slice() == b"ObjStm"
        ),
        _ => false,
    }
}

fn save_document(doc: &mut Document) -> Result<Vec<u8>> {
    doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| Error::Serialize(e.to_string()))?;
    Ok(output)
}
