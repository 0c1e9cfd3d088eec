//! Minimal example: sign an envelope and read a reply, offline.
//!
//! Builds a session, signs a two-call batch at a fixed location, then feeds
//! the interpreter the reply a server would send after login.
//! Run with: `cargo run --example sign_and_send`

use std::sync::Arc;

use pgo_rpc::clock::SystemClock;
use pgo_rpc::interpreter::{interpret, Interpretation};
use pgo_rpc::proto::{ResponseEnvelope, StatusCode};
use pgo_rpc::telemetry::DeviceInfo;
use pgo_rpc::{
    cell_at, AccessToken, AuthProvider, ClientConfig, EnvelopeSigner, Location, RpcError,
    SessionState, SubRequest,
};
use prost::Message;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup
    let config = ClientConfig::default();
    let mut session = SessionState::new(
        AccessToken::new(AuthProvider::Google, "demo-id-token"),
        config.endpoint.clone(),
    )?;
    let identity = |bytes: &[u8]| -> Result<Vec<u8>, RpcError> { Ok(bytes.to_vec()) };
    let signer = EnvelopeSigner::new(
        config.version_hash,
        config.start_time_adjustment_ms,
        Arc::new(identity),
        Arc::new(DeviceInfo {
            device_id: "demo-device".into(),
            ..Default::default()
        }),
        Arc::new(SystemClock::new()),
    );
    let here = Location::new(37.7749, -122.4194, 16.0, 5.0);

    // 2. Sign a batch
    let signed = signer.sign(
        &mut session,
        &here,
        vec![SubRequest::raw(2, vec![]), SubRequest::raw(4, vec![])],
    )?;
    println!(
        "request {} -> {} ({} bytes, {} fixes)",
        signed.request_id,
        session.endpoint(),
        signed.encode().len(),
        signed.signature.location_fix.len()
    );

    // 3. Interpret the login reply
    let reply = ResponseEnvelope {
        status_code: StatusCode::OkRpcUrlInResponse as i32,
        request_id: signed.request_id,
        api_url: "pgorelease.example.com/plfe/7".into(),
        auth_ticket: Some(b"demo-ticket".to_vec()),
        returns: vec![vec![0x01], vec![0x02]],
        ..Default::default()
    };
    match interpret(&mut session, false, &signed.requests, &reply.encode_to_vec())? {
        Interpretation::Completed(response) => {
            println!("{} sub-responses", response.subresponses.len())
        }
        Interpretation::Retry(reason) => println!("retry: {:?}", reason),
    }
    println!(
        "endpoint now {}, ticket held: {}",
        session.endpoint(),
        session.has_auth_ticket()
    );

    // 4. The map cell for this position
    println!("level-15 cell: {}", cell_at(here.latitude, here.longitude, 15)?);

    Ok(())
}
