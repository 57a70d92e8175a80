//! Content hashing for graph File nodes
//!
//! Every File node carries the SHA-256 of exactly the bytes written to disk.
//! JSON dumps are serialized once into canonical bytes (sorted keys,
//! two-space indent); those bytes are both hashed and written.

use crate::domain::{ElnError, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Hex-encoded SHA-256 of raw bytes
///
/// # Examples
///
/// ```
/// use eln_export::core::verification::checksum::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b"Hello"),
///     "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Canonical serialization of a JSON document: sorted keys, two-space indent
pub fn canonical_json_bytes(data: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&normalize_json(data))
        .map_err(|e| ElnError::Serialization(e.to_string()))
}

/// Recursively sort object keys so equal documents serialize identically
fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, normalize_json(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        _ => value.clone(),
    }
}
