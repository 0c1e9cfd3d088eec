//! Signed envelope construction.
//!
//! Every outgoing call is one `RequestEnvelope`. The signature rides along
//! as an encrypted platform request and binds the envelope to the session:
//!
//! ```text
//! RequestEnvelope
//! ├── status_code = 2, request_id, lat / lng / accuracy
//! ├── requests[]            (sub-requests, in caller order)
//! ├── auth_info | auth_ticket
//! └── platform_requests[0]  SEND_ENCRYPTED_SIGNATURE
//!     └── encrypt(Signature)
//!         ├── location_hash1 / location_hash2
//!         ├── request_hash[] (one per sub-request, once authenticated)
//!         ├── session_hash, timestamps, version hash
//!         └── location_fix[3], sensor, device, activity
//! ```

use std::any::Any;
use std::sync::Arc;

use prost::Message;
use tracing::debug;

use crate::clock::Clock;
use crate::crypto::SignatureEncryptor;
use crate::error::RpcError;
use crate::fix::Location;
use crate::hash::{self, RequestHasher};
use crate::proto::{self, PlatformRequestType, REQUEST_STATUS_CODE};
use crate::session::SessionState;
use crate::telemetry::{self, DeviceInfoProvider};

/// Fixed trailer of the first-request auth-info token.
pub const AUTH_INFO_TOKEN_UNKNOWN2: i32 = 59;

/// A decoded sub-response. Downcast with `SubResponse::downcast`.
pub type Decoded = Box<dyn Any + Send>;

/// Decoder for the payload a sub-request expects back.
pub type DecodeFn = fn(&[u8]) -> Result<Decoded, RpcError>;

fn decode_as<M>(bytes: &[u8]) -> Result<Decoded, RpcError>
where
    M: Message + Default + Send + 'static,
{
    Ok(Box::new(M::decode(bytes)?))
}

fn decode_raw(bytes: &[u8]) -> Result<Decoded, RpcError> {
    Ok(Box::new(bytes.to_vec()))
}

/// One game-logic call inside an envelope: its type tag, its encoded
/// payload, and the decoder for whatever comes back in the same position.
#[derive(Clone)]
pub struct SubRequest {
    pub request_type: i32,
    pub message: Vec<u8>,
    pub decoder: DecodeFn,
}

impl SubRequest {
    /// A sub-request whose response decodes as `Resp`.
    pub fn new<Req, Resp>(request_type: i32, message: &Req) -> Self
    where
        Req: Message,
        Resp: Message + Default + Send + 'static,
    {
        Self {
            request_type,
            message: message.encode_to_vec(),
            decoder: decode_as::<Resp>,
        }
    }

    /// A sub-request with a pre-encoded payload whose response is returned
    /// as raw bytes (`Vec<u8>`).
    pub fn raw(request_type: i32, message: Vec<u8>) -> Self {
        Self {
            request_type,
            message,
            decoder: decode_raw,
        }
    }

    pub(crate) fn to_proto(&self) -> proto::Request {
        proto::Request {
            request_type: self.request_type,
            request_message: self.message.clone(),
        }
    }
}

impl std::fmt::Debug for SubRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubRequest")
            .field("request_type", &self.request_type)
            .field("message_len", &self.message.len())
            .finish()
    }
}

/// An envelope ready to send, plus what is needed to read its response.
#[derive(Debug)]
pub struct SignedEnvelope {
    pub request_id: u64,
    pub envelope: proto::RequestEnvelope,
    /// The signature before encryption.
    pub signature: proto::Signature,
    /// Sub-requests in wire order, for positional response decoding.
    pub requests: Vec<SubRequest>,
}

impl SignedEnvelope {
    pub fn encode(&self) -> Vec<u8> {
        self.envelope.encode_to_vec()
    }
}

/// Builds signed envelopes for one client.
#[derive(Clone)]
pub struct EnvelopeSigner {
    version_hash: u32,
    start_time_adjustment_ms: u64,
    encryptor: Arc<dyn SignatureEncryptor>,
    device: Arc<dyn DeviceInfoProvider>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EnvelopeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeSigner")
            .field("version_hash", &self.version_hash)
            .field("start_time_adjustment_ms", &self.start_time_adjustment_ms)
            .finish_non_exhaustive()
    }
}

impl EnvelopeSigner {
    pub fn new(
        version_hash: u32,
        start_time_adjustment_ms: u64,
        encryptor: Arc<dyn SignatureEncryptor>,
        device: Arc<dyn DeviceInfoProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            version_hash,
            start_time_adjustment_ms,
            encryptor,
            device,
            clock,
        }
    }

    /// Build and sign the envelope for `requests` at `location`.
    ///
    /// Advances the session's fix window and request counter. The auth
    /// ticket is read, never written.
    pub fn sign(
        &self,
        session: &mut SessionState,
        location: &Location,
        requests: Vec<SubRequest>,
    ) -> Result<SignedEnvelope, RpcError> {
        let since_start = self.clock.since_start_ms();
        let ms_since_last_fix =
            session
                .fixes
                .next_ms_since_last_fix(&mut session.rng, location, since_start);

        // Hash input is the ticket once we have one, else the auth-info block.
        let (auth_info, auth_ticket, auth_bytes) = match session.auth_ticket() {
            Some(ticket) => {
                let bytes = ticket.as_bytes().to_vec();
                (None, Some(bytes.clone()), bytes)
            }
            None => {
                let info = auth_info(session);
                let bytes = info.encode_to_vec();
                (Some(info), None, bytes)
            }
        };

        let wire_requests: Vec<proto::Request> = requests.iter().map(SubRequest::to_proto).collect();
        let request_hash = if auth_ticket.is_some() {
            let hasher = RequestHasher::new(&auth_bytes);
            wire_requests
                .iter()
                .map(|r| hasher.hash(&r.encode_to_vec()))
                .collect()
        } else {
            Vec::new()
        };

        let location_hex = hash::location_hex(location.latitude, location.longitude, location.accuracy);
        let location_hash2 = hash::location_only_hash(&location_hex);
        let location_hash1 = hash::location_hash(&auth_bytes, &location_hex);

        let since_start = since_start + self.start_time_adjustment_ms;
        let signature = proto::Signature {
            timestamp_since_start: since_start,
            location_fix: session.fixes.to_proto(),
            sensor_info: Some(telemetry::random_sensor_info(&mut session.rng, since_start)),
            device_info: Some(self.device.device_info().into()),
            activity_status: Some(telemetry::activity_status()),
            location_hash1,
            location_hash2,
            session_hash: session.session_hash()?.to_vec(),
            timestamp: self.clock.timestamp_ms(),
            request_hash,
            unknown25: i64::from(self.version_hash),
        };
        let platform_request = self.platform_request(&signature)?;

        let request_id = session.request_id;
        let envelope = proto::RequestEnvelope {
            status_code: REQUEST_STATUS_CODE,
            request_id,
            requests: wire_requests,
            platform_requests: vec![platform_request],
            latitude: location.latitude,
            longitude: location.longitude,
            accuracy: location.accuracy,
            auth_info,
            auth_ticket,
            ms_since_last_locationfix: ms_since_last_fix as i64,
        };
        session.request_id += 1;

        debug!(
            request_id,
            sub_requests = requests.len(),
            authenticated = envelope.auth_ticket.is_some(),
            ms_since_last_fix,
            "signed envelope"
        );

        Ok(SignedEnvelope {
            request_id,
            envelope,
            signature,
            requests,
        })
    }

    fn platform_request(&self, signature: &proto::Signature) -> Result<proto::PlatformRequest, RpcError> {
        let encrypted_signature = self.encryptor.encrypt(&signature.encode_to_vec())?;
        let inner = proto::SendEncryptedSignatureRequest { encrypted_signature };
        Ok(proto::PlatformRequest {
            r#type: PlatformRequestType::SendEncryptedSignature as i32,
            request_message: inner.encode_to_vec(),
        })
    }
}

/// The first-request credentials block.
fn auth_info(session: &SessionState) -> proto::AuthInfo {
    let token = &session.access_token;
    proto::AuthInfo {
        provider: token.provider().as_str().to_string(),
        token: Some(proto::JwtToken {
            contents: token.secret().to_string(),
            unknown2: AUTH_INFO_TOKEN_UNKNOWN2,
        }),
    }
}
