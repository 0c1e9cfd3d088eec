//! Long-lived client session state.
//!
//! One `SessionState` lives for the whole lifetime of a client. The signer
//! and the interpreter are the only code that mutates it; everything else
//! produced per request is discarded once the response has been read.
//!
//! Credentials (`AuthTicket`, `AccessToken`) are opaque, not `Clone`, and
//! zeroised on drop.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{self, SESSION_HASH_LEN};
use crate::error::RpcError;
use crate::fix::FixWindow;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Session-continuation credential issued by the server.
///
/// Held as the exact bytes the server sent; those bytes are re-sent on every
/// request and hashed into the signature.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct AuthTicket {
    bytes: Vec<u8>,
}

impl AuthTicket {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for AuthTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTicket")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Login provider the access token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Ptc,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Ptc => "ptc",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access token produced by the login handshake.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    token: String,
    #[zeroize(skip)]
    provider: AuthProvider,
}

impl AccessToken {
    pub fn new(provider: AuthProvider, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            provider,
        }
    }

    pub fn provider(&self) -> AuthProvider {
        self.provider
    }

    pub(crate) fn secret(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Process-held state shared by every request a client makes.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) access_token: AccessToken,
    pub(crate) auth_ticket: Option<AuthTicket>,
    pub(crate) endpoint: String,
    pub(crate) banned: bool,
    pub(crate) expired: bool,
    pub(crate) request_id: u64,
    pub(crate) session_hash: Option<[u8; SESSION_HASH_LEN]>,
    pub(crate) fixes: FixWindow,
    pub(crate) rng: ChaCha20Rng,
}

impl SessionState {
    /// A fresh session whose telemetry generator is seeded from the OS.
    pub fn new(access_token: AccessToken, endpoint: impl Into<String>) -> Result<Self, RpcError> {
        let seed = crypto::generate_seed()?;
        Ok(Self::with_rng(access_token, endpoint, ChaCha20Rng::from_seed(seed)))
    }

    /// A fresh session with a caller-chosen random source.
    pub fn with_rng(
        access_token: AccessToken,
        endpoint: impl Into<String>,
        rng: ChaCha20Rng,
    ) -> Self {
        Self {
            access_token,
            auth_ticket: None,
            endpoint: endpoint.into(),
            banned: false,
            expired: false,
            request_id: 1,
            session_hash: None,
            fixes: FixWindow::new(),
            rng,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_banned(&self) -> bool {
        self.banned
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn auth_ticket(&self) -> Option<&AuthTicket> {
        self.auth_ticket.as_ref()
    }

    pub fn has_auth_ticket(&self) -> bool {
        self.auth_ticket.is_some()
    }

    pub fn fixes(&self) -> &FixWindow {
        &self.fixes
    }

    /// Install a ticket obtained out of band.
    pub fn set_auth_ticket(&mut self, ticket: AuthTicket) {
        self.auth_ticket = Some(ticket);
    }

    /// Swap in a refreshed access token and restart the handshake: the next
    /// request carries a new auth-info block instead of the old ticket.
    pub fn replace_access_token(&mut self, token: AccessToken) {
        self.access_token = token;
        self.auth_ticket = None;
        self.expired = false;
    }

    /// The session salt, generated on first use and stable afterwards.
    pub(crate) fn session_hash(&mut self) -> Result<[u8; SESSION_HASH_LEN], RpcError> {
        match self.session_hash {
            Some(hash) => Ok(hash),
            None => {
                let hash = crypto::generate_session_hash()?;
                self.session_hash = Some(hash);
                Ok(hash)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::with_rng(
            AccessToken::new(AuthProvider::Ptc, "token"),
            "https://example.com/rpc",
            ChaCha20Rng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session();
        assert_eq!(s.request_id(), 1);
        assert!(!s.is_banned());
        assert!(!s.is_expired());
        assert!(!s.has_auth_ticket());
        assert!(s.fixes().is_empty());
    }

    #[test]
    fn test_os_seeded_session() {
        let mut s = SessionState::new(
            AccessToken::new(AuthProvider::Google, "token"),
            "https://example.com/rpc",
        )
        .unwrap();
        assert_eq!(s.request_id(), 1);
        assert_eq!(s.endpoint(), "https://example.com/rpc");
        assert_eq!(s.session_hash().unwrap().len(), SESSION_HASH_LEN);
    }

    #[test]
    fn test_session_hash_is_stable() {
        let mut s = session();
        let first = s.session_hash().unwrap();
        assert_eq!(s.session_hash().unwrap(), first);
    }

    #[test]
    fn test_replacing_token_drops_ticket() {
        let mut s = session();
        s.set_auth_ticket(AuthTicket::from_bytes(vec![1, 2, 3]));
        s.expired = true;
        s.replace_access_token(AccessToken::new(AuthProvider::Google, "fresh"));
        assert!(!s.has_auth_ticket());
        assert!(!s.is_expired());
        assert_eq!(s.access_token.provider().as_str(), "google");
    }

    #[test]
    fn test_credentials_do_not_leak_through_debug() {
        let token = AccessToken::new(AuthProvider::Ptc, "super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        let ticket = AuthTicket::from_bytes(b"ticket-bytes".to_vec());
        assert_eq!(format!("{:?}", ticket), "AuthTicket { len: 12 }");
    }
}
