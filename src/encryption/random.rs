//! Random sources for file identifier generation.

use crate::crypto::md5;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of random bytes for new file identifiers.
///
/// Injected into the handler so tests can supply deterministic bytes.
pub trait RandomSource {
    /// Fill `buf` with random bytes.
    fn fill_random(&mut self, buf: &mut [u8]);
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn fill_random(&mut self, buf: &mut [u8]) {
        (**self).fill_random(buf)
    }
}

/// Operating system CSPRNG via `getrandom`.
///
/// Falls back to [`ClockRandom`] if the OS source reports an error.
#[derive(Debug, Default)]
pub struct OsRandom {
    fallback: ClockRandom,
}

impl OsRandom {
    /// Create a new OS-backed source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for OsRandom {
    fn fill_random(&mut self, buf: &mut [u8]) {
        if let Err(e) = getrandom::getrandom(buf) {
            log::warn!(
                "OS random source unavailable ({}), using clock-based fallback for file ID",
                e
            );
            self.fallback.fill_random(buf);
        }
    }
}

/// Weak fallback generator: MD5 over the clock, process id and a counter.
///
/// Not cryptographically strong. File identifiers only need to be unique,
/// not secret, so this is acceptable when no OS source exists.
#[derive(Debug, Default)]
pub struct ClockRandom {
    counter: u64,
    state: [u8; 16],
}

impl RandomSource for ClockRandom {
    fn fill_random(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(md5::DIGEST_LEN) {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            self.counter = self.counter.wrapping_add(1);

            self.state = md5::digest_parts(&[
                &self.state,
                &now.as_nanos().to_le_bytes(),
                &std::process::id().to_le_bytes(),
                &self.counter.to_le_bytes(),
            ]);
            chunk.copy_from_slice(&self.state[..chunk.len()]);
        }
    }
}
