//! Chained non-cryptographic hashing for the request signature.
//!
//! These are anti-tamper fingerprints, not security primitives. Each chain
//! hashes the auth bytes first and feeds that digest in as the seed for the
//! second stage:
//!
//! ```text
//! location_hash_1 = xxh32(location_hex, seed = xxh32(auth_bytes, HASH_SEED))
//! location_hash_2 = xxh32(location_hex, seed = HASH_SEED)
//! request_hash    = xxh64(request,      seed = xxh64(auth_bytes, HASH_SEED))
//! ```
//!
//! The input order is part of the protocol. Swapping stages produces a
//! different, rejected, signature.

use xxhash_rust::xxh32::xxh32;
use xxhash_rust::xxh64::xxh64;

/// Seed for the first stage of every chain.
pub const HASH_SEED: u32 = 0x6165_6632;

/// Length of the location hex string: three big-endian `f64`s.
pub const LOCATION_HEX_LEN: usize = 24;

pub fn hash32(seed: u32, bytes: &[u8]) -> u32 {
    xxh32(bytes, seed)
}

pub fn hash64(seed: u64, bytes: &[u8]) -> u64 {
    xxh64(bytes, seed)
}

/// Raw big-endian bytes of latitude, longitude and accuracy, in that order.
pub fn location_hex(latitude: f64, longitude: f64, accuracy: f64) -> [u8; LOCATION_HEX_LEN] {
    let mut out = [0u8; LOCATION_HEX_LEN];
    out[..8].copy_from_slice(&latitude.to_be_bytes());
    out[8..16].copy_from_slice(&longitude.to_be_bytes());
    out[16..].copy_from_slice(&accuracy.to_be_bytes());
    out
}

/// `location_hash_1`: the location chained onto the auth bytes.
pub fn location_hash(auth_bytes: &[u8], location_hex: &[u8]) -> u32 {
    let first = hash32(HASH_SEED, auth_bytes);
    hash32(first, location_hex)
}

/// `location_hash_2`: the location alone under the fixed seed.
pub fn location_only_hash(location_hex: &[u8]) -> u32 {
    hash32(HASH_SEED, location_hex)
}

/// Per-sub-request hash. Only computed once an auth ticket exists.
pub fn request_hash(auth_bytes: &[u8], request_bytes: &[u8]) -> u64 {
    let first = hash64(u64::from(HASH_SEED), auth_bytes);
    hash64(first, request_bytes)
}

/// Hashes the same auth bytes against many sub-requests, reusing the first
/// stage.
#[derive(Debug, Clone, Copy)]
pub struct RequestHasher {
    seed: u64,
}

impl RequestHasher {
    pub fn new(auth_bytes: &[u8]) -> Self {
        Self {
            seed: hash64(u64::from(HASH_SEED), auth_bytes),
        }
    }

    pub fn hash(&self, request_bytes: &[u8]) -> u64 {
        hash64(self.seed, request_bytes)
    }
}
