//! Response envelope interpretation.
//!
//! The status code of a decoded response drives a small state machine:
//!
//! ```text
//! OK / OK_RPC_URL_IN_RESPONSE -> decode sub-responses by position
//! BAD_REQUEST                 -> banned = true,  Err(Banned)
//! REDIRECT                    -> endpoint = https://{api_url}/rpc, retry
//! INVALID_AUTH_TOKEN          -> refresh + retry, or expired = true, Err(AuthTokenExpired)
//! INVALID_REQUEST             -> Err(InvalidRequest)
//! INVALID_PLATFORM_REQUEST    -> Err(DelayRequired)
//! SESSION_INVALIDATED         -> Err(SessionInvalidated)
//! anything else               -> Err(UnknownProtocolError)
//! ```
//!
//! A ticket in the response replaces the session's ticket whatever the
//! status. A response that fails to decode, or whose payload count does not
//! match the request, leaves the session untouched.

use std::any::Any;

use prost::Message;
use tracing::{info, warn};

use crate::error::RpcError;
use crate::proto::{ResponseEnvelope, StatusCode};
use crate::session::{AuthTicket, SessionState};
use crate::signer::{Decoded, SubRequest};

/// One decoded sub-response, tagged with the type of the request it answers.
pub struct SubResponse {
    pub request_type: i32,
    value: Decoded,
}

impl SubResponse {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the decoded value out, or get `self` back if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let request_type = self.request_type;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|value| Self {
                request_type,
                value,
            })
    }
}

impl std::fmt::Debug for SubResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubResponse")
            .field("request_type", &self.request_type)
            .finish_non_exhaustive()
    }
}

/// A successful exchange.
#[derive(Debug)]
pub struct ApiResponse {
    pub request_id: u64,
    pub status: StatusCode,
    /// One entry per sub-request, in request order.
    pub subresponses: Vec<SubResponse>,
}

/// Why the caller should send the same calls again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// The endpoint moved; the session already points at the new one.
    Redirect { endpoint: String },
    /// The token was rejected and automatic refresh is on.
    TokenRefreshRequired,
}

#[derive(Debug)]
pub enum Interpretation {
    Completed(ApiResponse),
    Retry(RetryReason),
}

/// Read a raw response body against the sub-requests that produced it.
pub fn interpret(
    session: &mut SessionState,
    refresh_auth_tokens: bool,
    requests: &[SubRequest],
    body: &[u8],
) -> Result<Interpretation, RpcError> {
    let response = ResponseEnvelope::decode(body)?;
    let status = StatusCode::try_from(response.status_code).unwrap_or(StatusCode::Unknown);

    // Everything that can fail without a status-code reason is checked
    // before the session is touched.
    let subresponses = match status {
        StatusCode::Ok | StatusCode::OkRpcUrlInResponse => {
            Some(decode_subresponses(requests, &response.returns)?)
        }
        _ => None,
    };
    if status == StatusCode::Redirect && response.api_url.is_empty() {
        return Err(RpcError::ProtocolDecode("redirect without api_url".to_string()));
    }

    if let Some(ticket) = response.auth_ticket {
        session.auth_ticket = Some(AuthTicket::from_bytes(ticket));
    }

    match status {
        StatusCode::Ok | StatusCode::OkRpcUrlInResponse => {
            if status == StatusCode::OkRpcUrlInResponse && !response.api_url.is_empty() {
                session.endpoint = rpc_endpoint(&response.api_url);
                info!(endpoint = %session.endpoint, "endpoint updated");
            }
            Ok(Interpretation::Completed(ApiResponse {
                request_id: response.request_id,
                status,
                subresponses: subresponses.unwrap_or_default(),
            }))
        }
        StatusCode::BadRequest => {
            session.banned = true;
            warn!("account may be banned");
            Err(RpcError::Banned)
        }
        StatusCode::Redirect => {
            session.endpoint = rpc_endpoint(&response.api_url);
            info!(endpoint = %session.endpoint, "redirected to new endpoint");
            Ok(Interpretation::Retry(RetryReason::Redirect {
                endpoint: session.endpoint.clone(),
            }))
        }
        StatusCode::InvalidAuthToken => {
            if refresh_auth_tokens {
                info!("auth token expired, refreshing");
                Ok(Interpretation::Retry(RetryReason::TokenRefreshRequired))
            } else {
                session.expired = true;
                warn!("auth token expired");
                Err(RpcError::AuthTokenExpired)
            }
        }
        StatusCode::InvalidRequest => {
            warn!("request was invalid");
            Err(RpcError::InvalidRequest)
        }
        StatusCode::InvalidPlatformRequest => {
            warn!("platform request rejected, back off before retrying");
            Err(RpcError::DelayRequired)
        }
        StatusCode::SessionInvalidated => {
            warn!("session invalidated");
            Err(RpcError::SessionInvalidated)
        }
        StatusCode::Unknown => {
            warn!(status_code = response.status_code, "unknown response status");
            Err(RpcError::UnknownProtocolError(response.status_code))
        }
    }
}

/// `https://{api_url}/rpc`
pub fn rpc_endpoint(api_url: &str) -> String {
    format!("https://{}/rpc", api_url)
}

/// Pair each returned payload with the decoder of the request in the same
/// position.
fn decode_subresponses(
    requests: &[SubRequest],
    returns: &[Vec<u8>],
) -> Result<Vec<SubResponse>, RpcError> {
    if requests.len() != returns.len() {
        return Err(RpcError::SubResponseCountMismatch {
            expected: requests.len(),
            got: returns.len(),
        });
    }

    requests
        .iter()
        .zip(returns)
        .map(|(request, bytes)| {
            Ok(SubResponse {
                request_type: request.request_type,
                value: (request.decoder)(bytes)?,
            })
        })
        .collect()
}
