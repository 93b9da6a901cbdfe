//! Integration tests for PDF encryption on write.
//!
//! Tests encryption functionality including:
//! - Encrypting a minimal one-page document with RC4 128-bit
//! - File identifier generation and reuse
//! - Round-trip decryption with keys re-derived from the user password
//! - Objects and keys that must stay in plaintext
//! - Error wrapping and file helpers
//! - Decryption of the output by lopdf's own reader

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use pdf_encrypt_lite::api::{ensure_unencrypted, is_encrypted, protect_file};
use pdf_encrypt_lite::encryption::algorithms::{authenticate_user_password, encrypt_object};
use pdf_encrypt_lite::encryption::{EncryptDict, RandomSource, PERMISSIONS};
use pdf_encrypt_lite::{
    encrypt_document, encrypt_pdf, encrypt_pdf_with, hex_to_bytes, EncryptionConfig, Error,
};
use tempfile::tempdir;

const PAGE_TEXT: &[u8] = b"BT /F1 24 Tf 72 720 Td (Hello World) Tj ET";
const TITLE: &[u8] = b"Encryption Test Document";

/// Deterministic random source: 0x42, 0x43, ...
struct Sequence(u8);

impl RandomSource for Sequence {
    fn fill_random(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.0;
            self.0 = self.0.wrapping_add(1);
        }
    }
}

/// Object ids of the interesting parts of the test document.
struct TestDoc {
    doc: Document,
    content_id: ObjectId,
    info_id: ObjectId,
}

/// Helper to create a minimal one-page PDF with a font, a content stream and
/// an Info dictionary.
fn create_test_document() -> TestDoc {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Font".to_vec()),
        "Subtype" => Object::Name(b"Type1".to_vec()),
        "BaseFont" => Object::Name(b"Helvetica".to_vec()),
    });
    let content_id = doc.add_object(Stream::new(Dictionary::new(), PAGE_TEXT.to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Page".to_vec()),
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
        "Contents" => Object::Reference(content_id),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(vec![Object::Reference(page_id)]),
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(TITLE.to_vec(), StringFormat::Literal),
        "Producer" => Object::String(b"pdf_encrypt_lite".to_vec(), StringFormat::Literal),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    TestDoc {
        doc,
        content_id,
        info_id,
    }
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn encrypt_dict_of(doc: &Document) -> EncryptDict {
    let encrypt_ref = match doc.trailer.get(b"Encrypt") {
        Ok(Object::Reference(id)) => *id,
        other => panic!("unexpected /Encrypt {:?}", other),
    };
    match doc.get_object(encrypt_ref).unwrap() {
        Object::Dictionary(dict) => EncryptDict::from_dictionary(dict).unwrap(),
        other => panic!("unexpected encryption dictionary {:?}", other),
    }
}

fn trailer_ids(doc: &Document) -> Vec<Vec<u8>> {
    match doc.trailer.get(b"ID").unwrap() {
        Object::Array(items) => items
            .iter()
            .map(|item| match item {
                Object::String(bytes, StringFormat::Hexadecimal) => bytes.clone(),
                other => panic!("unexpected /ID element {:?}", other),
            })
            .collect(),
        other => panic!("unexpected /ID {:?}", other),
    }
}

fn dict_string(doc: &Document, id: ObjectId, key: &[u8]) -> Vec<u8> {
    match doc.get_object(id).unwrap() {
        Object::Dictionary(dict) => match dict.get(key).unwrap() {
            Object::String(bytes, _) => bytes.clone(),
            other => panic!("unexpected value {:?}", other),
        },
        other => panic!("unexpected object {:?}", other),
    }
}

fn stream_content(doc: &Document, id: ObjectId) -> Vec<u8> {
    match doc.get_object(id).unwrap() {
        Object::Stream(stream) => stream.content.clone(),
        other => panic!("unexpected object {:?}", other),
    }
}

mod minimal_document_tests {
    use super::*;

    #[test]
    fn test_encrypt_generates_file_id() {
        let mut test_doc = create_test_document();
        let report = encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0x42),
        )
        .unwrap();

        let ids = trailer_ids(&test_doc.doc);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[0].len(), 16);
        assert_eq!(ids[0][0], 0x42);
        assert_eq!(report.file_id.as_bytes(), &ids[0][..]);
    }

    #[test]
    fn test_encrypt_dictionary_values() {
        let mut test_doc = create_test_document();
        encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();

        let dict = encrypt_dict_of(&test_doc.doc);
        assert_eq!(dict.version, 2);
        assert_eq!(dict.revision, 3);
        assert_eq!(dict.length, 128);
        assert_eq!(dict.permissions, -4);
        assert_eq!(dict.permissions, PERMISSIONS);
        assert_eq!(dict.owner_key.len(), 32);
        assert_eq!(dict.user_key.len(), 32);
        assert!(dict.user_key[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_strings_and_streams_change() {
        let mut test_doc = create_test_document();
        let report = encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();

        assert_eq!(report.streams_encrypted, 1);
        assert_eq!(report.strings_encrypted, 2);
        assert_ne!(dict_string(&test_doc.doc, test_doc.info_id, b"Title"), TITLE);
        assert_ne!(stream_content(&test_doc.doc, test_doc.content_id), PAGE_TEXT);
        assert_eq!(
            stream_content(&test_doc.doc, test_doc.content_id).len(),
            PAGE_TEXT.len()
        );
    }

    #[test]
    fn test_serialized_output() {
        let mut test_doc = create_test_document();
        let input = save(&mut test_doc.doc);

        let output =
            encrypt_pdf_with(&input, &EncryptionConfig::new("secret123"), &mut Sequence(0))
                .unwrap();

        assert!(output.starts_with(b"%PDF-1.4"));
        assert!(contains(&output, b"/Encrypt"));
        assert!(contains(&output, b"/Standard"));
        assert!(contains(&output, b"xref"));
        assert!(!contains(&output, b"Hello World"));
        assert!(!contains(&output, TITLE));
    }
}

mod file_id_tests {
    use super::*;

    #[test]
    fn test_existing_id_is_used() {
        let existing = hex_to_bytes("<0123456789ABCDEF0123456789ABCDEF>").unwrap();
        let mut test_doc = create_test_document();
        test_doc.doc.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(existing.clone(), StringFormat::Hexadecimal),
                Object::String(existing.clone(), StringFormat::Hexadecimal),
            ]),
        );

        let report = encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();

        assert_eq!(report.file_id.as_bytes(), &existing[..]);
        assert_eq!(
            report.file_id.to_hex(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn test_keys_depend_on_file_id() {
        let mut a = create_test_document();
        let mut b = create_test_document();
        let config = EncryptionConfig::new("secret123");
        encrypt_document(&mut a.doc, &config, &mut Sequence(0)).unwrap();
        encrypt_document(&mut b.doc, &config, &mut Sequence(1)).unwrap();

        // O does not involve the file ID, U does
        assert_eq!(encrypt_dict_of(&a.doc).owner_key, encrypt_dict_of(&b.doc).owner_key);
        assert_ne!(encrypt_dict_of(&a.doc).user_key, encrypt_dict_of(&b.doc).user_key);
    }
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn test_decrypt_with_user_password() {
        let mut test_doc = create_test_document();
        encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(7),
        )
        .unwrap();

        let dict = encrypt_dict_of(&test_doc.doc);
        let file_id = trailer_ids(&test_doc.doc).remove(0);
        let key = authenticate_user_password(
            b"secret123",
            &dict.user_key,
            &dict.owner_key,
            dict.permissions,
            &file_id,
        )
        .unwrap()
        .expect("user password should authenticate");

        let (obj_num, gen_num) = test_doc.info_id;
        let title = dict_string(&test_doc.doc, test_doc.info_id, b"Title");
        assert_eq!(encrypt_object(&title, obj_num, gen_num, key.as_slice()).unwrap(), TITLE);

        let (obj_num, gen_num) = test_doc.content_id;
        let content = stream_content(&test_doc.doc, test_doc.content_id);
        assert_eq!(encrypt_object(&content, obj_num, gen_num, key.as_slice()).unwrap(), PAGE_TEXT);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut test_doc = create_test_document();
        encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(7),
        )
        .unwrap();

        let dict = encrypt_dict_of(&test_doc.doc);
        let file_id = trailer_ids(&test_doc.doc).remove(0);
        let key = authenticate_user_password(
            b"secret124",
            &dict.user_key,
            &dict.owner_key,
            dict.permissions,
            &file_id,
        )
        .unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn test_distinct_owner_password() {
        let mut same = create_test_document();
        let mut distinct = create_test_document();
        encrypt_document(&mut same.doc, &EncryptionConfig::new("pw"), &mut Sequence(0)).unwrap();
        encrypt_document(
            &mut distinct.doc,
            &EncryptionConfig::new("pw").with_owner_password("admin"),
            &mut Sequence(0),
        )
        .unwrap();

        let same_dict = encrypt_dict_of(&same.doc);
        let distinct_dict = encrypt_dict_of(&distinct.doc);
        assert_ne!(same_dict.owner_key, distinct_dict.owner_key);

        // The user password still opens the document
        let file_id = trailer_ids(&distinct.doc).remove(0);
        assert!(authenticate_user_password(
            b"pw",
            &distinct_dict.user_key,
            &distinct_dict.owner_key,
            distinct_dict.permissions,
            &file_id,
        )
        .unwrap()
        .is_some());
    }
}

mod plaintext_tests {
    use super::*;

    #[test]
    fn test_standard_dictionary_unchanged() {
        let mut test_doc = create_test_document();
        let security_id = test_doc.doc.add_object(dictionary! {
            "Filter" => Object::Name(b"Standard".to_vec()),
            "Note" => Object::String(b"leave me".to_vec(), StringFormat::Literal),
        });

        let report = encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();

        assert_eq!(report.objects_skipped, 1);
        assert_eq!(dict_string(&test_doc.doc, security_id, b"Note"), b"leave me");
        match test_doc.doc.get_object(security_id).unwrap() {
            Object::Dictionary(dict) => assert!(matches!(
                dict.get(b"Note"),
                Ok(Object::String(_, StringFormat::Literal))
            )),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_stream_framing_keys_unchanged() {
        let mut test_doc = create_test_document();
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        dict.set(
            "DecodeParms",
            dictionary! {
                "Predictor" => Object::Integer(12),
                "Label" => Object::String(b"params".to_vec(), StringFormat::Literal),
            },
        );
        let stream_id = test_doc
            .doc
            .add_object(Stream::new(dict, vec![0x78, 0x9C, 0x03, 0x00, 0x00]));

        encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();

        match test_doc.doc.get_object(stream_id).unwrap() {
            Object::Stream(stream) => {
                assert!(matches!(stream.dict.get(b"Length"), Ok(Object::Integer(5))));
                assert!(matches!(
                    stream.dict.get(b"Filter"),
                    Ok(Object::Name(name)) if name == b"FlateDecode"
                ));
                match stream.dict.get(b"DecodeParms").unwrap() {
                    Object::Dictionary(parms) => {
                        assert!(matches!(parms.get(b"Predictor"), Ok(Object::Integer(12))));
                        assert!(matches!(
                            parms.get(b"Label"),
                            Ok(Object::String(s, StringFormat::Literal)) if s == b"params"
                        ));
                    },
                    other => panic!("unexpected /DecodeParms {:?}", other),
                }
                assert_ne!(stream.content, vec![0x78, 0x9C, 0x03, 0x00, 0x00]);
            },
            other => panic!("unexpected {:?}", other),
        }
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_invalid_input_wrapped() {
        let err = encrypt_pdf(b"%PDF-garbage", "secret123", None).unwrap_err();
        assert!(matches!(err, Error::EncryptionFailure(_)));
        assert!(err.to_string().starts_with("Failed to encrypt PDF: "));
    }

    #[test]
    fn test_empty_input_wrapped() {
        let err = encrypt_pdf(&[], "secret123", None).unwrap_err();
        assert!(matches!(err, Error::EncryptionFailure(_)));
    }

    #[test]
    fn test_already_encrypted_document() {
        let mut test_doc = create_test_document();
        assert!(ensure_unencrypted(&test_doc.doc).is_ok());
        encrypt_document(
            &mut test_doc.doc,
            &EncryptionConfig::new("secret123"),
            &mut Sequence(0),
        )
        .unwrap();
        assert!(matches!(
            ensure_unencrypted(&test_doc.doc),
            Err(Error::AlreadyEncrypted)
        ));
    }

    #[test]
    fn test_is_encrypted_plain() {
        let mut test_doc = create_test_document();
        assert!(!is_encrypted(&save(&mut test_doc.doc)).unwrap());
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_protect_file_round_trip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("report.pdf");
        let output = dir.path().join("protected-report.pdf");

        let mut test_doc = create_test_document();
        std::fs::write(&input, save(&mut test_doc.doc)).unwrap();

        let report = protect_file(&input, &output, &EncryptionConfig::new("secret123")).unwrap();
        assert_eq!(report.streams_encrypted, 1);
        assert_eq!(report.file_id.as_bytes().len(), 16);

        let written = std::fs::read(&output).unwrap();
        assert!(contains(&written, b"/Encrypt"));
        assert!(!contains(&written, b"Hello World"));

        // The input is left untouched
        assert!(contains(&std::fs::read(&input).unwrap(), b"Hello World"));
    }
}

mod reader_compat_tests {
    use super::*;
    use lopdf::xref::XrefType;

    fn decrypt_with_lopdf(output: &[u8], test_doc: &TestDoc) {
        let mut doc = Document::load_mem(output).unwrap();
        doc.decrypt("secret123").unwrap();

        let info_id = match doc.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => *id,
            other => panic!("unexpected /Info {:?}", other),
        };
        assert_eq!(info_id, test_doc.info_id);
        assert_eq!(dict_string(&doc, info_id, b"Title"), TITLE);
        assert_eq!(stream_content(&doc, test_doc.content_id), PAGE_TEXT);
    }

    #[test]
    fn test_lopdf_decrypts_output() {
        let mut test_doc = create_test_document();
        let input = save(&mut test_doc.doc);

        let output = encrypt_pdf(&input, "secret123", None).unwrap();
        assert!(!contains(&output, TITLE));
        decrypt_with_lopdf(&output, &test_doc);
    }

    #[test]
    fn test_lopdf_decrypts_output_of_xref_stream_input() {
        let mut test_doc = create_test_document();
        test_doc.doc.reference_table.cross_reference_type = XrefType::CrossReferenceStream;
        let input = save(&mut test_doc.doc);
        assert!(contains(&input, b"/XRef"));

        let output = encrypt_pdf(&input, "secret123", None).unwrap();
        assert!(!contains(&output, b"/XRef"));
        assert!(contains(&output, b"xref"));
        decrypt_with_lopdf(&output, &test_doc);
    }
}
