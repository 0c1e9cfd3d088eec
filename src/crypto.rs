//! Secret material and the signature encryption seam.
//!
//! This module is the only place in the crate that imports `ring`. It owns
//! two responsibilities:
//! - **Session salt**: 16 random bytes, generated once per session via
//!   `SystemRandom` and carried in every signature.
//! - **Encryption**: the serialized signature passes through an injected
//!   `SignatureEncryptor` before it is attached to the envelope. The
//!   algorithm is not this crate's concern.

use ring::rand::{SecureRandom, SystemRandom};

use crate::error::RpcError;

/// Size of the session salt in bytes.
pub const SESSION_HASH_LEN: usize = 16;

/// Generate the per-session salt.
///
/// Uses `ring::rand::SystemRandom`. Called at most once per session; the
/// result is cached in the session state.
pub fn generate_session_hash() -> Result<[u8; SESSION_HASH_LEN], RpcError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SESSION_HASH_LEN];
    rng.fill(&mut salt).map_err(|_| RpcError::RandomnessFailure)?;
    Ok(salt)
}

/// Generate a 32-byte seed for the telemetry generator.
pub fn generate_seed() -> Result<[u8; 32], RpcError> {
    let rng = SystemRandom::new();
    let mut seed = [0u8; 32];
    rng.fill(&mut seed).map_err(|_| RpcError::RandomnessFailure)?;
    Ok(seed)
}

/// Black-box transform applied to the serialized signature.
pub trait SignatureEncryptor: Send + Sync {
    fn encrypt(&self, signature: &[u8]) -> Result<Vec<u8>, RpcError>;
}

impl<F> SignatureEncryptor for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, RpcError> + Send + Sync,
{
    fn encrypt(&self, signature: &[u8]) -> Result<Vec<u8>, RpcError> {
        self(signature)
    }
}
