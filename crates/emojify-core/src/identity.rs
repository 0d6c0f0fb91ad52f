//! Best-effort client identification for rate limiting and logging.

use sha2::{Digest, Sha256};

/// Forwarding-chain header; the first entry is the original client.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Direct client address header set by the edge proxy.
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Identifier used when no header yields an address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Number of hex characters kept from the digest.
const HASH_LEN: usize = 16;

/// A resolved client identifier and its loggable hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Raw identifier. Used as the rate-limit key; never logged.
    pub raw: String,
    /// Truncated SHA-256 hex digest of `raw`.
    pub hash: String,
}

impl ClientIdentity {
    /// Resolve from the two header values (already decoded to text).
    pub fn resolve(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Self {
        let raw = resolve_client(forwarded_for, real_ip);
        let hash = hash_identifier(&raw);
        Self { raw, hash }
    }
}

/// Pick the client identifier: first forwarded entry, else the direct IP,
/// else [`UNKNOWN_CLIENT`].
pub fn resolve_client(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .unwrap_or_default();
    if !forwarded.is_empty() {
        return forwarded.to_string();
    }
    match real_ip {
        Some(ip) if !ip.is_empty() => ip.to_string(),
        _ => UNKNOWN_CLIENT.to_string(),
    }
}

/// One-way hash of an identifier, truncated for log lines.
pub fn hash_identifier(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(HASH_LEN);
    encoded
}
