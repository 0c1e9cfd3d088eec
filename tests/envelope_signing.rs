use std::sync::Arc;

use pgo_rpc::clock::ManualClock;
use pgo_rpc::hash;
use pgo_rpc::proto::{self, PlatformRequestType};
use pgo_rpc::telemetry::DeviceInfo;
use pgo_rpc::{
    AccessToken, AuthProvider, AuthTicket, EnvelopeSigner, Location, RpcError, SessionState,
    SignedEnvelope, SubRequest,
};
use prost::Message;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const EPOCH_MS: u64 = 1_700_000_000_000;

fn xor_encryptor(bytes: &[u8]) -> Result<Vec<u8>, RpcError> {
    Ok(bytes.iter().map(|b| b ^ 0x5a).collect())
}

fn signer(clock: Arc<ManualClock>, adjustment_ms: u64) -> EnvelopeSigner {
    EnvelopeSigner::new(
        7,
        adjustment_ms,
        Arc::new(xor_encryptor),
        Arc::new(DeviceInfo {
            device_id: "0123456789abcdef".into(),
            device_brand: Some("Apple".into()),
            ..Default::default()
        }),
        clock,
    )
}

fn session() -> SessionState {
    SessionState::with_rng(
        AccessToken::new(AuthProvider::Google, "id-token"),
        "https://example.com/rpc",
        ChaCha20Rng::seed_from_u64(42),
    )
}

fn decrypted_signature(signed: &SignedEnvelope) -> proto::Signature {
    let platform = &signed.envelope.platform_requests[0];
    let inner =
        proto::SendEncryptedSignatureRequest::decode(platform.request_message.as_slice()).unwrap();
    let plain: Vec<u8> = inner.encrypted_signature.iter().map(|b| b ^ 0x5a).collect();
    proto::Signature::decode(plain.as_slice()).unwrap()
}

#[test]
fn test_envelope_round_trips_through_the_wire() {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let mut session = session();
    let here = Location::new(37.7749, -122.4194, 12.0, 5.0);
    let signed = signer(clock, 0)
        .sign(
            &mut session,
            &here,
            vec![SubRequest::raw(2, vec![]), SubRequest::raw(126, vec![0x10, 0x01])],
        )
        .unwrap();

    let decoded = proto::RequestEnvelope::decode(signed.encode().as_slice()).unwrap();
    assert_eq!(decoded, signed.envelope);
    assert_eq!(decoded.requests.len(), 2);
    assert_eq!(decoded.requests[1].request_type, 126);
    assert_eq!(decoded.latitude, 37.7749);
    assert_eq!(decoded.accuracy, 5.0);
    assert_eq!(decoded.platform_requests.len(), 1);
    assert_eq!(
        decoded.platform_requests[0].r#type,
        PlatformRequestType::SendEncryptedSignature as i32
    );
}

#[test]
fn test_authenticated_signature_is_bound_to_ticket() {
    // 1. Authenticate the session with a known ticket.
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let mut session = session();
    session.set_auth_ticket(AuthTicket::from_bytes(b"auth-ticket".to_vec()));

    // 2. Sign a call at a known location.
    let here = Location::new(37.7749, -122.4194, 12.0, 5.0);
    let signed = signer(clock, 0)
        .sign(&mut session, &here, vec![SubRequest::raw(2, vec![])])
        .unwrap();

    // 3. The encrypted signature must carry the expected fingerprints.
    let sig = decrypted_signature(&signed);
    assert_eq!(sig.location_hash1, 0x7f6c_1769);
    assert_eq!(sig.location_hash2, 0x949f_27cf);
    assert_eq!(sig.request_hash, vec![0xb46f_ba6f_a915_f051]);
    assert_eq!(sig.unknown25, 7);
    assert_eq!(sig.device_info.unwrap().device_brand.as_deref(), Some("Apple"));
}

#[test]
fn test_unauthenticated_location_hash_uses_auth_info() {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let mut session = session();
    let here = Location::new(37.7749, -122.4194, 12.0, 5.0);
    let signed = signer(clock, 0).sign(&mut session, &here, vec![]).unwrap();

    let auth_bytes = signed.envelope.auth_info.as_ref().unwrap().encode_to_vec();
    let hex = hash::location_hex(37.7749, -122.4194, 5.0);
    assert_eq!(signed.signature.location_hash1, hash::location_hash(&auth_bytes, &hex));
    assert_eq!(signed.signature.location_hash2, 0x949f_27cf);
}

#[test]
fn test_fix_window_follows_the_clock() {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let signer = signer(clock.clone(), 0);
    let mut session = session();
    let here = Location::new(37.7749, -122.4194, 12.0, 5.0);

    let first = signer.sign(&mut session, &here, vec![]).unwrap();
    let ages: Vec<u64> = first.signature.location_fix.iter().map(|f| f.timestamp_snapshot).collect();
    assert_eq!(ages.len(), 3);
    assert!((500..750).contains(&ages[0]));
    assert!((350..450).contains(&ages[1]));
    assert!((200..300).contains(&ages[2]));

    // A quick follow-up only ages the existing fixes.
    clock.advance(100);
    let second = signer.sign(&mut session, &here, vec![]).unwrap();
    let aged: Vec<u64> = second.signature.location_fix.iter().map(|f| f.timestamp_snapshot).collect();
    assert_eq!(aged, ages.iter().map(|a| a + 100).collect::<Vec<_>>());
    assert_eq!(second.envelope.ms_since_last_locationfix as u64, ages[2] + 100);

    // A long pause retires the oldest fix and appends a fresh one.
    clock.advance(2_000);
    let third = signer.sign(&mut session, &here, vec![]).unwrap();
    let fixes = &third.signature.location_fix;
    assert_eq!(fixes.len(), 3);
    assert_eq!(fixes[0].timestamp_snapshot, ages[1] + 2_100);
    assert_eq!(fixes[1].timestamp_snapshot, ages[2] + 2_100);
    assert!((200..300).contains(&fixes[2].timestamp_snapshot));
    assert_eq!(third.envelope.ms_since_last_locationfix as u64, fixes[2].timestamp_snapshot);
}

#[test]
fn test_location_hashes_ignore_fix_window_movement() {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let signer = signer(clock.clone(), 0);
    let mut session = session();
    session.set_auth_ticket(AuthTicket::from_bytes(b"auth-ticket".to_vec()));
    let here = Location::new(37.7749, -122.4194, 12.0, 5.0);

    let first = signer.sign(&mut session, &here, vec![]).unwrap();
    // Long enough to evict a fix.
    clock.advance(1_500);
    let second = signer.sign(&mut session, &here, vec![]).unwrap();

    assert_ne!(first.signature.location_fix, second.signature.location_fix);
    assert_eq!(first.signature.location_hash1, second.signature.location_hash1);
    assert_eq!(first.signature.location_hash2, second.signature.location_hash2);
}

#[test]
fn test_start_time_adjustment_shifts_elapsed_fields() {
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    clock.advance(40);
    let mut session = session();
    let here = Location::new(1.0, 1.0, 1.0, 1.0);
    let signed = signer(clock, 5_000).sign(&mut session, &here, vec![]).unwrap();

    assert_eq!(signed.signature.timestamp_since_start, 5_040);
    assert_eq!(signed.signature.sensor_info.unwrap().timestamp_snapshot, 5_040);
    assert_eq!(signed.signature.timestamp, EPOCH_MS + 40);
}

#[test]
fn test_encryption_failure_does_not_consume_request_id() {
    let failing = |_: &[u8]| -> Result<Vec<u8>, RpcError> { Err(RpcError::EncryptionFailure) };
    let signer = EnvelopeSigner::new(
        0,
        0,
        Arc::new(failing),
        Arc::new(DeviceInfo::default()),
        Arc::new(ManualClock::new(EPOCH_MS)),
    );
    let mut session = session();
    let err = signer
        .sign(&mut session, &Location::new(1.0, 1.0, 1.0, 1.0), vec![])
        .unwrap_err();
    assert_eq!(err, RpcError::EncryptionFailure);
    assert_eq!(session.request_id(), 1);
}
