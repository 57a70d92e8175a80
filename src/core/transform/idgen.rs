//! Identifier generation for sheet extracts

use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of random bytes behind a generated id
pub const GENERATED_ID_BYTES: usize = 20;

/// Source of fresh file identifiers
///
/// Generated ids name files on disk and suffix graph node ids, so they must be
/// unique within an entry folder and path-safe.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// 20 random bytes, hex-encoded
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut bytes = [0u8; GENERATED_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Deterministic ids `<prefix>-0`, `<prefix>-1`, ... for reproducible runs
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
