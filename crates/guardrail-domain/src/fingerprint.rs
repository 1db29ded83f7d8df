use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a rule result.
///
/// Identity fields:
/// - rule_id
/// - resource address (`kind.name` or `kind[index]`)
pub fn fingerprint_for_result(rule_id: &str, resource_address: &str) -> String {
    let canonical = [rule_id, resource_address].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
