//! Categorical encodings shared with the training pipeline.

use sha2::{Digest, Sha256};
use std::net::IpAddr;

pub const PROTO_CODES: &[(&str, u8)] = &[("tcp", 0), ("udp", 1), ("icmp", 2), ("other", 3)];

pub const STATE_CODES: &[(&str, u8)] = &[
    ("FIN", 0),
    ("INT", 1),
    ("CON", 2),
    ("REQ", 3),
    ("RST", 4),
    ("PAR", 5),
    ("acc", 6),
    ("other", 7),
];

pub const SERVICE_CODES: &[(&str, u8)] = &[
    ("http", 0),
    ("ssh", 1),
    ("dns", 2),
    ("smtp", 3),
    ("ftp", 4),
    ("ftp-data", 5),
    ("-", 6),
    ("other", 7),
];

fn lookup(codes: &[(&str, u8)], label: &str) -> u8 {
    codes
        .iter()
        .find(|(name, _)| *name == label)
        .or_else(|| codes.iter().find(|(name, _)| *name == "other"))
        .map(|(_, code)| *code)
        .unwrap_or(0)
}

/// Protocol code; unknown labels map to `other`.
pub fn proto_code(label: &str) -> u8 {
    lookup(PROTO_CODES, label)
}

/// Connection state code; unknown labels map to `other`.
pub fn state_code(label: &str) -> u8 {
    lookup(STATE_CODES, label)
}

/// Service code; unknown labels map to `other`, which is distinct from `-`.
pub fn service_code(label: &str) -> u8 {
    lookup(SERVICE_CODES, label)
}

/// Stable 31-bit code for an address, from the SHA-256 of its textual form.
pub fn hash_address(addr: &IpAddr) -> u32 {
    let digest = Sha256::digest(addr.to_string().as_bytes());
    let prefix = [digest[0], digest[1], digest[2], digest[3]];
    u32::from_be_bytes(prefix) & 0x7fff_ffff
}
