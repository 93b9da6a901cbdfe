//! High-level API for password-protecting PDFs.
//!
//! This module provides the entry points most callers need:
//! - Encrypting PDF bytes with a user (and optional owner) password
//! - Encrypting with an injected random source for reproducible output
//! - Checking for existing encryption before protecting a file
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_encrypt_lite::encrypt_pdf;
//!
//! let bytes = std::fs::read("report.pdf")?;
//! let protected = encrypt_pdf(&bytes, "secret123", None)?;
//! std::fs::write("protected-report.pdf", protected)?;
//! ```
//!
//! ## Files
//!
//! ```ignore
//! use pdf_encrypt_lite::api::protect_file;
//! use pdf_encrypt_lite::EncryptionConfig;
//!
//! let config = EncryptionConfig::new("secret123").with_owner_password("admin");
//! let report = protect_file("report.pdf", "protected-report.pdf", &config)?;
//! println!("{} strings encrypted", report.strings_encrypted);
//! ```

mod protect;

pub use protect::{encrypt_pdf, encrypt_pdf_with, ensure_unencrypted, is_encrypted, protect_file};
