// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Encrypt Lite
//!
//! Password protection for existing PDF documents using the Standard
//! security handler (ISO 32000-1:2008, Section 7.6).
//!
//! ## Core Features
//!
//! - **RC4 128-bit**: V=2, R=3 encryption readable by any PDF 1.4+ viewer
//! - **Owner and user passwords**: O and U values per Algorithms 3 and 5
//! - **File identifiers**: reuses the trailer `/ID`, or generates one
//! - **Whole-document traversal**: every string and stream of every object
//! - **Self-contained primitives**: MD5, RC4 and hex helpers re-exported
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_encrypt_lite::encrypt_pdf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("report.pdf")?;
//! let protected = encrypt_pdf(&bytes, "secret123", None)?;
//! std::fs::write("protected-report.pdf", protected)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`crypto`]: MD5, RC4 and hex codecs
//! - [`encryption`]: key derivation, object traversal, the `/Encrypt` dictionary
//! - [`api`]: load, encrypt and save entry points
//! - [`config`]: password configuration
//! - [`error`]: error type shared by every module

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Cryptographic primitives
pub mod crypto;

// Standard security handler
pub mod encryption;

// High-level API
pub mod api;

pub use api::{encrypt_pdf, encrypt_pdf_with};
pub use config::EncryptionConfig;
pub use crypto::md5::digest as md5;
pub use crypto::{bytes_to_hex, hex_to_bytes, Rc4};
pub use encryption::{encrypt_document, EncryptionReport};
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
