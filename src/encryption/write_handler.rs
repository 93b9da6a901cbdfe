//! Encryption handler for writing encrypted PDFs.
//!
//! This module provides the EncryptionWriteHandler which walks every indirect
//! object of a document and replaces its strings and stream payloads with
//! RC4 ciphertext under the per-object key.

use super::algorithms;
use super::{FILTER_STANDARD, PLAINTEXT_KEYS};
use crate::error::{Error, Result};
use lopdf::{Dictionary, Object, ObjectId, StringFormat};
use std::collections::BTreeMap;

/// Maximum nesting of arrays and dictionaries inside one object.
const MAX_NESTING_DEPTH: u32 = 100;

/// Counters collected while encrypting the object table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    /// Indirect objects that were visited and encrypted
    pub objects_encrypted: usize,
    /// Indirect objects left untouched (security handler dictionaries)
    pub objects_skipped: usize,
    /// String values replaced with ciphertext
    pub strings_encrypted: usize,
    /// Stream payloads replaced with ciphertext
    pub streams_encrypted: usize,
}

/// Whether `object` is a dictionary with `/Filter /Standard`.
///
/// Such dictionaries are security handler dictionaries and are never
/// encrypted. Streams are not matched even if their dictionary carries the
/// same entry.
pub fn is_standard_security_dict(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => {
            matches!(dict.get(b"Filter"), Ok(Object::Name(name)) if name.as_slice() == FILTER_STANDARD)
        },
        _ => false,
    }
}

/// Handler for encrypting PDF objects during write operations.
///
/// Borrows the file encryption key; per-object keys are derived on demand
/// and wiped after use.
pub struct EncryptionWriteHandler<'a> {
    encryption_key: &'a [u8],
}

impl<'a> EncryptionWriteHandler<'a> {
    /// Create a handler for the given file encryption key.
    pub fn new(encryption_key: &'a [u8]) -> Self {
        Self { encryption_key }
    }

    /// Encrypt a string belonging to object `obj_num gen_num`.
    pub fn encrypt_string(&self, data: &[u8], obj_num: u32, gen_num: u16) -> Result<Vec<u8>> {
        algorithms::encrypt_object(data, obj_num, gen_num, self.encryption_key)
    }

    /// Encrypt a stream payload belonging to object `obj_num gen_num`.
    ///
    /// RC4 preserves length, so `/Length` stays valid.
    pub fn encrypt_stream(&self, data: &[u8], obj_num: u32, gen_num: u16) -> Result<Vec<u8>> {
        algorithms::encrypt_object(data, obj_num, gen_num, self.encryption_key)
    }

    /// Encrypt every indirect object in place.
    ///
    /// Objects for which [`is_standard_security_dict`] holds are skipped.
    pub fn encrypt_objects(&self, objects: &mut BTreeMap<ObjectId, Object>) -> Result<TraversalStats> {
        let mut stats = TraversalStats::default();

        for (&(obj_num, gen_num), object) in objects.iter_mut() {
            if is_standard_security_dict(object) {
                log::debug!("Skipping security handler dictionary {} {} R", obj_num, gen_num);
                stats.objects_skipped += 1;
                continue;
            }

            self.visit(object, obj_num, gen_num, 0, &mut stats)?;
            stats.objects_encrypted += 1;
        }

        log::debug!(
            "Encrypted {} objects ({} strings, {} streams), skipped {}",
            stats.objects_encrypted,
            stats.strings_encrypted,
            stats.streams_encrypted,
            stats.objects_skipped
        );
        Ok(stats)
    }

    fn visit(
        &self,
        object: &mut Object,
        obj_num: u32,
        gen_num: u16,
        depth: u32,
        stats: &mut TraversalStats,
    ) -> Result<()> {
        if depth >= MAX_NESTING_DEPTH {
            log::error!(
                "Nesting depth limit exceeded ({}) in object {} {} R",
                MAX_NESTING_DEPTH,
                obj_num,
                gen_num
            );
            return Err(Error::RecursionLimitExceeded(MAX_NESTING_DEPTH));
        }

        match object {
            Object::String(bytes, format) => {
                *bytes = self.encrypt_string(bytes, obj_num, gen_num)?;
                // Ciphertext is binary; hex keeps the output printable
                *format = StringFormat::Hexadecimal;
                stats.strings_encrypted += 1;
            },
            Object::Array(items) => {
                for item in items.iter_mut() {
                    self.visit(item, obj_num, gen_num, depth + 1, stats)?;
                }
            },
            Object::Dictionary(dict) => {
                self.visit_dictionary(dict, obj_num, gen_num, depth, stats)?;
            },
            Object::Stream(stream) => {
                self.visit_dictionary(&mut stream.dict, obj_num, gen_num, depth, stats)?;
                stream.content = self.encrypt_stream(&stream.content, obj_num, gen_num)?;
                stats.streams_encrypted += 1;
            },
            Object::Null
            | Object::Boolean(_)
            | Object::Integer(_)
            | Object::Real(_)
            | Object::Name(_)
            | Object::Reference(_) => {},
        }

        Ok(())
    }

    fn visit_dictionary(
        &self,
        dict: &mut Dictionary,
        obj_num: u32,
        gen_num: u16,
        depth: u32,
        stats: &mut TraversalStats,
    ) -> Result<()> {
        for (key, value) in dict.iter_mut() {
            if PLAINTEXT_KEYS.contains(&key.as_slice()) {
                continue;
            }
            self.visit(value, obj_num, gen_num, depth + 1, stats)?;
        }
        Ok(())
    }
}
