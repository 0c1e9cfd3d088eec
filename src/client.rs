//! Request orchestration.
//!
//! ```text
//! execute(intent, location, requests)
//!   lock session ── sign ──────────── unlock
//!   POST envelope to session endpoint          (no lock held)
//!   lock session ── interpret ─────── unlock
//!   [token refresh when asked for]
//! ```
//!
//! Two concurrent calls on one client never interleave their signing or
//! their interpretation, so fix windows, request ids and tickets stay
//! consistent. Their network round trips may overlap.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::crypto::SignatureEncryptor;
use crate::error::RpcError;
use crate::fix::Location;
use crate::intent::Intent;
use crate::interpreter::{self, ApiResponse, Interpretation, RetryReason};
use crate::session::{AccessToken, AuthProvider, SessionState};
use crate::signer::{EnvelopeSigner, SubRequest};
use crate::telemetry::DeviceInfoProvider;
use crate::transport::{HttpTransport, Transport};

/// Attempts `RpcClient::call` makes before giving up on retry outcomes.
pub const MAX_ATTEMPTS: usize = 3;

/// Obtains a fresh access token when the server rejects the current one.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, provider: AuthProvider) -> Result<AccessToken, RpcError>;
}

/// Result of one round trip.
#[derive(Debug)]
pub enum Outcome {
    Completed {
        intent: Intent,
        response: ApiResponse,
    },
    /// Session state changed; send the same calls again.
    RetryRequired { intent: Intent, reason: RetryReason },
}

pub struct RpcClient {
    config: ClientConfig,
    session: Mutex<SessionState>,
    signer: EnvelopeSigner,
    transport: Arc<dyn Transport>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("config", &self.config)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    /// A production client: reqwest transport, system clock, OS-seeded
    /// telemetry.
    pub fn new(
        config: ClientConfig,
        access_token: AccessToken,
        encryptor: Arc<dyn SignatureEncryptor>,
        device: Arc<dyn DeviceInfoProvider>,
    ) -> Result<Self, RpcError> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        let session = SessionState::new(access_token, config.endpoint.clone())?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let signer = EnvelopeSigner::new(
            config.version_hash,
            config.start_time_adjustment_ms,
            encryptor,
            device,
            clock,
        );
        Ok(Self::from_parts(config, session, signer, transport))
    }

    pub fn from_parts(
        config: ClientConfig,
        session: SessionState,
        signer: EnvelopeSigner,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            session: Mutex::new(session),
            signer,
            transport,
            refresher: None,
        }
    }

    pub fn with_token_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Exclusive access to the session, e.g. to inspect flags or install a
    /// ticket. Holding the guard blocks every in-flight call.
    pub async fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().await
    }

    /// Sign `requests`, send them and interpret the reply.
    pub async fn execute(
        &self,
        intent: Intent,
        location: &Location,
        requests: Vec<SubRequest>,
    ) -> Result<Outcome, RpcError> {
        let (signed, endpoint) = {
            let mut session = self.session.lock().await;
            let signed = self.signer.sign(&mut session, location, requests)?;
            (signed, session.endpoint.clone())
        };
        debug!(%intent, request_id = signed.request_id, %endpoint, "sending envelope");

        let body = self.transport.post(&endpoint, signed.encode()).await?;

        let interpretation = {
            let mut session = self.session.lock().await;
            interpreter::interpret(
                &mut session,
                self.config.refresh_auth_tokens,
                &signed.requests,
                &body,
            )?
        };

        match interpretation {
            Interpretation::Completed(response) => Ok(Outcome::Completed { intent, response }),
            Interpretation::Retry(RetryReason::TokenRefreshRequired) => {
                self.refresh_token().await?;
                Ok(Outcome::RetryRequired {
                    intent,
                    reason: RetryReason::TokenRefreshRequired,
                })
            }
            Interpretation::Retry(reason) => Ok(Outcome::RetryRequired { intent, reason }),
        }
    }

    /// `execute`, resending while the server asks for a retry.
    pub async fn call(
        &self,
        intent: Intent,
        location: &Location,
        requests: Vec<SubRequest>,
    ) -> Result<ApiResponse, RpcError> {
        let mut attempt = 1;
        loop {
            match self.execute(intent, location, requests.clone()).await? {
                Outcome::Completed { response, .. } => return Ok(response),
                Outcome::RetryRequired { reason, .. } if attempt >= MAX_ATTEMPTS => {
                    warn!(%intent, ?reason, "giving up after {} attempts", attempt);
                    return Err(RpcError::RetriesExhausted {
                        attempts: attempt,
                        last: reason,
                    });
                }
                Outcome::RetryRequired { reason, .. } => {
                    debug!(%intent, attempt, ?reason, "retrying");
                    attempt += 1;
                }
            }
        }
    }

    async fn refresh_token(&self) -> Result<(), RpcError> {
        let provider = self.session.lock().await.access_token.provider();
        let refresher = match &self.refresher {
            Some(refresher) => refresher,
            None => {
                self.session.lock().await.expired = true;
                return Err(RpcError::TokenRefresh("no token refresher configured".to_string()));
            }
        };

        match refresher.refresh(provider).await {
            Ok(token) => {
                self.session.lock().await.replace_access_token(token);
                info!(%provider, "access token refreshed");
                Ok(())
            }
            Err(e) => {
                self.session.lock().await.expired = true;
                warn!(%provider, error = %e, "access token refresh failed");
                Err(e)
            }
        }
    }
}
