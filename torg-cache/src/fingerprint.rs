//! Content-addressable cache keys.

use torg_core::errors::TorgResult;

/// Fingerprint an operation and its parameters into a stable hex key.
///
/// Parameters pass through `serde_json`, whose objects keep their keys
/// ordered, so logically equal parameter sets always produce the same key
/// regardless of how the caller assembled them.
pub fn fingerprint(operation: &str, params: &serde_json::Value) -> TorgResult<String> {
    let canonical = serde_json::to_string(params)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(operation.as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical.as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}
