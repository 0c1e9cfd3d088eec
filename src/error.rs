//! Error types for pgo-rpc.
//!
//! Every variant is a distinct way a call can fail. The status-derived
//! variants (`Banned` through `UnknownProtocolError`) come straight from the
//! server's response envelope; the rest are local or transport failures.

use std::fmt;
use std::time::Duration;

use crate::interpreter::RetryReason;

/// Nominal backoff the server expects after rejecting a platform request.
pub const DELAY_REQUIRED_BACKOFF: Duration = Duration::from_secs(10);

/// The single error type for all pgo-rpc operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The HTTP call itself failed (connection refused, TLS, timeout).
    Transport(String),

    /// The server answered with an HTTP status other than 200.
    HttpStatus(u16),

    /// The server flagged the account (`BAD_REQUEST`).
    Banned,

    /// The auth ticket was rejected and automatic refresh is disabled.
    AuthTokenExpired,

    /// The server rejected the request envelope as malformed.
    InvalidRequest,

    /// The server rejected the platform request. Back off before retrying.
    DelayRequired,

    /// The server dropped the session.
    SessionInvalidated,

    /// The server returned a status code this client does not handle.
    UnknownProtocolError(i32),

    /// The response envelope or a sub-response could not be decoded.
    ProtocolDecode(String),

    /// The number of returned payloads does not match the number of
    /// sub-requests that were sent.
    SubResponseCountMismatch { expected: usize, got: usize },

    /// An argument was outside the range an operation accepts.
    InvalidArgument(String),

    /// The server kept asking for a retry (redirect, token refresh) past
    /// the client's attempt limit.
    RetriesExhausted { attempts: usize, last: RetryReason },

    /// The signature encryptor failed.
    EncryptionFailure,

    /// The system's random number generator failed to produce bytes.
    RandomnessFailure,

    /// The token-refresh collaborator failed.
    TokenRefresh(String),

    /// Configuration could not be loaded or parsed.
    Config(String),
}

impl RpcError {
    /// True for errors derived from the response envelope's status code.
    pub fn is_protocol_status(&self) -> bool {
        matches!(
            self,
            Self::Banned
                | Self::AuthTokenExpired
                | Self::InvalidRequest
                | Self::DelayRequired
                | Self::SessionInvalidated
                | Self::UnknownProtocolError(_)
                | Self::RetriesExhausted { .. }
        )
    }

    /// How long the caller should wait before retrying, if the server said so.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::DelayRequired => Some(DELAY_REQUIRED_BACKOFF),
            _ => None,
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "transport error: {}", reason),
            Self::HttpStatus(code) => write!(f, "unexpected http status {}, expected 200", code),
            Self::Banned => write!(f, "account may be banned"),
            Self::AuthTokenExpired => write!(f, "auth token expired"),
            Self::InvalidRequest => write!(f, "request was invalid"),
            Self::DelayRequired => write!(f, "platform request rejected, delay required"),
            Self::SessionInvalidated => write!(f, "session invalidated"),
            Self::UnknownProtocolError(code) => write!(f, "unknown protocol status {}", code),
            Self::ProtocolDecode(reason) => write!(f, "protocol decode error: {}", reason),
            Self::SubResponseCountMismatch { expected, got } => write!(
                f,
                "sub-response count mismatch: sent {}, got {}",
                expected, got
            ),
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {}", reason),
            Self::RetriesExhausted { attempts, last } => write!(
                f,
                "server still asked for a retry after {} attempts (last: {:?})",
                attempts, last
            ),
            Self::EncryptionFailure => write!(f, "signature encryption failed"),
            Self::RandomnessFailure => write!(f, "randomness source failed"),
            Self::TokenRefresh(reason) => write!(f, "token refresh failed: {}", reason),
            Self::Config(reason) => write!(f, "config error: {}", reason),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<prost::DecodeError> for RpcError {
    fn from(err: prost::DecodeError) -> Self {
        Self::ProtocolDecode(err.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_classified() {
        assert!(RpcError::Banned.is_protocol_status());
        assert!(RpcError::UnknownProtocolError(7).is_protocol_status());
        assert!(!RpcError::HttpStatus(500).is_protocol_status());
        assert!(!RpcError::ProtocolDecode("eof".into()).is_protocol_status());
        let exhausted = RpcError::RetriesExhausted {
            attempts: 3,
            last: RetryReason::TokenRefreshRequired,
        };
        assert!(exhausted.is_protocol_status());
        assert!(!matches!(exhausted, RpcError::Transport(_)));
    }

    #[test]
    fn test_only_delay_required_carries_backoff() {
        assert_eq!(RpcError::DelayRequired.retry_after(), Some(Duration::from_secs(10)));
        assert_eq!(RpcError::InvalidRequest.retry_after(), None);
    }
}
