//! Password-protect a PDF
//!
//! Encrypts a PDF with RC4 128-bit using the Standard security handler.
//!
//! Usage:
//!   cargo run --release --bin protect_pdf -- report.pdf --password secret123
//!   cargo run --release --bin protect_pdf -- report.pdf --password pw --owner-password admin --output out.pdf
//!
//! Without `--output` the result is written next to the input as
//! `protected-<name>`.

use pdf_encrypt_lite::api::protect_file;
use pdf_encrypt_lite::{EncryptionConfig, Error};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

struct ProtectConfig {
    input: PathBuf,
    output: PathBuf,
    encryption: EncryptionConfig,
}

impl ProtectConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args)
    }

    fn parse(args: &[String]) -> Result<Self, String> {
        let mut input = None;
        let mut output = None;
        let mut password = None;
        let mut owner_password = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--password" | "-p" => {
                    i += 1;
                    password = args.get(i).cloned();
                },
                "--owner-password" => {
                    i += 1;
                    owner_password = args.get(i).cloned();
                },
                "--output" | "-o" => {
                    i += 1;
                    output = args.get(i).map(PathBuf::from);
                },
                "--help" | "-h" => return Err(usage()),
                flag if flag.starts_with('-') => {
                    return Err(format!("Unknown option: {}\n\n{}", flag, usage()));
                },
                path => input = Some(PathBuf::from(path)),
            }
            i += 1;
        }

        let input = input.ok_or_else(usage)?;
        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => return Err("Please enter a password to protect the PDF.".to_string()),
        };
        let output = output.unwrap_or_else(|| default_output(&input));

        Ok(Self {
            input,
            output,
            encryption: EncryptionConfig::new(password)
                .with_optional_owner_password(owner_password),
        })
    }
}

fn usage() -> String {
    "Usage: protect_pdf <input.pdf> --password <pw> [--owner-password <pw>] [--output <path>]"
        .to_string()
}

fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(format!("protected-{}", name))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ProtectConfig::from_args() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        },
    };

    let start = Instant::now();
    match protect_file(&config.input, &config.output, &config.encryption) {
        Ok(report) => {
            println!(
                "✓ {} -> {} ({} objects, {} strings, {} streams) in {:.2?}",
                config.input.display(),
                config.output.display(),
                report.objects_encrypted,
                report.strings_encrypted,
                report.streams_encrypted,
                start.elapsed()
            );
        },
        Err(Error::AlreadyEncrypted) => {
            eprintln!("This PDF is already password protected.");
            process::exit(1);
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
