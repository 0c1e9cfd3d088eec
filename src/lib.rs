//! # pgo-rpc
//!
//! Client-side RPC envelope pipeline for a location-based game server.
//!
//! Game-logic calls are batched into a single protobuf envelope, signed with
//! chained xxHash fingerprints of the caller's location and credentials,
//! decorated with simulated device telemetry, and POSTed to the current
//! endpoint. Replies are interpreted against a session that tracks the auth
//! ticket, redirects and account flags. Location is also projected into S2
//! cell ids for map queries.
//!
//! ## Public API
//!
//! `RpcClient` is the usual entry point. The lower-level pieces
//! (`EnvelopeSigner`, `interpreter::interpret`, `CellId`, the `hash` chains)
//! are public for callers that bring their own transport or scheduling.

pub mod cell;
pub mod client;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fix;
pub mod hash;
pub mod intent;
pub mod interpreter;
pub mod point;
pub mod proto;
pub mod session;
pub mod signer;
pub mod telemetry;
pub mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use cell::CellId;
pub use client::{Outcome, RpcClient, TokenRefresher};
pub use config::ClientConfig;
pub use error::RpcError;
pub use fix::Location;
pub use intent::Intent;
pub use interpreter::{ApiResponse, RetryReason, SubResponse};
pub use point::Point;
pub use session::{AccessToken, AuthProvider, AuthTicket, SessionState};
pub use signer::{EnvelopeSigner, SignedEnvelope, SubRequest};

/// The cell at `level` containing a coordinate.
pub fn cell_at(lat_degrees: f64, lng_degrees: f64, level: u8) -> Result<CellId, RpcError> {
    CellId::from_lat_lng(lat_degrees, lng_degrees).parent(level)
}
