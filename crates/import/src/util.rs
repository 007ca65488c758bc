use sha2::{Digest, Sha256};

/// Number of hex characters kept from a content digest.
pub const SHORT_DIGEST_LEN: usize = 8;

/// SHA-256 of an in-memory byte slice.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex encoding.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// First [`SHORT_DIGEST_LEN`] hex characters of the SHA-256 of `text`.
pub fn short_digest(text: &str) -> String {
    let mut hex = to_hex(&sha256_bytes(text.as_bytes()));
    hex.truncate(SHORT_DIGEST_LEN);
    hex
}
