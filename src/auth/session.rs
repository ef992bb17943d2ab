//! Session handle coordinating state transitions, service calls, and
//! token persistence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::api::CredentialService;
use crate::auth::state::{AuthEvent, AuthState, AuthStatus};
use crate::store::TokenStore;

/// Key under which the token is persisted in a [`TokenStore`].
pub const TOKEN_KEY: &str = "token";

struct Inner {
    state: AuthState,
    /// Sequence number of the most recently started request or logout.
    /// A settling call whose number is older than this is discarded.
    latest_seq: u64,
    next_seq: u64,
    /// Token value already verified (or freshly issued by sign-in), so
    /// `resume` runs at most once per observed token value.
    resumed_token: Option<String>,
}

/// Shared handle to the authentication session.
///
/// Seeded from the token store at construction; mutated only through
/// [`log_in`](Self::log_in), [`log_out`](Self::log_out), and
/// [`resume`](Self::resume). Clone is cheap - all clones observe the same
/// state, so the handle can be passed into whatever needs it instead of
/// being looked up ambiently.
///
/// Service failures are converted into the `error` field of the state and
/// never returned to the caller.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Mutex<Inner>>,
    store: Arc<dyn TokenStore>,
    service: Arc<dyn CredentialService>,
}

impl AuthSession {
    /// Creates a session seeded from `store`. No service call is made;
    /// call [`resume`](Self::resume) to re-verify a persisted token.
    ///
    /// A store read failure degrades to starting unauthenticated.
    pub fn new(store: Arc<dyn TokenStore>, service: Arc<dyn CredentialService>) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token, starting unauthenticated");
                String::new()
            }
        };
        debug!(seeded = !token.is_empty(), "Auth session created");

        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: AuthState::seeded(token),
                latest_seq: 0,
                next_seq: 1,
                resumed_token: None,
            })),
            store,
            service,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Re-verifies the seeded token against the credential service.
    ///
    /// Does nothing when no token is present, or when the current token
    /// value has already been verified. On success the state is re-issued
    /// unchanged; on failure the token stays in memory with the error set.
    pub async fn resume(&self) {
        // Snapshot the token and claim the sequence number in one critical
        // section, so a concurrent logout cannot slip in between them.
        let (token, seq) = {
            let mut inner = self.lock();
            if inner.state.token.is_empty() {
                return;
            }
            if inner.resumed_token.as_deref() == Some(inner.state.token.as_str()) {
                debug!("Token already verified, skipping re-verification");
                return;
            }
            let token = inner.state.token.clone();
            (token, Self::claim_request(&mut inner))
        };

        match self.service.verify_token(&token).await {
            Ok(()) => {
                let mut inner = self.lock();
                if inner.latest_seq != seq {
                    debug!(seq, "Discarding superseded verification result");
                    return;
                }
                inner.resumed_token = Some(token.clone());
                inner.state = inner.state.apply(&AuthEvent::Authenticated(token));
            }
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                let mut inner = self.lock();
                if inner.latest_seq != seq {
                    debug!(seq, "Discarding superseded verification result");
                    return;
                }
                // Remember the rejected value so resume stays once-per-token.
                inner.resumed_token = Some(token);
                inner.state = inner.state.apply(&AuthEvent::RequestFailed(e.to_string()));
            }
        }
    }

    /// Exchanges credentials for a token. A single attempt, no retries.
    ///
    /// On success the token is persisted to the store before the state
    /// settles; on failure the store is untouched and the error message
    /// lands in the state.
    pub async fn log_in(&self, id: &str, password: &str) {
        let seq = self.begin_request();
        match self.service.sign_in(id, password).await {
            Ok(token) => {
                let mut inner = self.lock();
                if inner.latest_seq != seq {
                    debug!(seq, "Discarding superseded sign-in result");
                    return;
                }
                // In-memory state stays authoritative when persistence fails.
                if let Err(e) = self.store.set(TOKEN_KEY, &token) {
                    warn!(error = %e, "Failed to persist token");
                }
                inner.resumed_token = Some(token.clone());
                inner.state = inner.state.apply(&AuthEvent::Authenticated(token));
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                let mut inner = self.lock();
                if inner.latest_seq != seq {
                    debug!(seq, "Discarding superseded sign-in result");
                    return;
                }
                inner.state = inner.state.apply(&AuthEvent::RequestFailed(e.to_string()));
            }
        }
    }

    /// Removes the stored token (best-effort) and clears the state.
    /// Idempotent, and supersedes any call still in flight.
    pub fn log_out(&self) {
        // The sequence number is claimed before the store is touched, and
        // the remove happens under the same lock as the in-flight calls'
        // store writes: a sign-in settling after this point is discarded
        // before it can re-persist its token.
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.latest_seq = seq;
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
        inner.resumed_token = None;
        inner.state = inner.state.apply(&AuthEvent::LoggedOut);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.lock().state.clone()
    }

    pub fn token(&self) -> String {
        self.lock().state.token.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading
    }

    pub fn error(&self) -> String {
        self.lock().state.error.clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.lock().state.status()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Claims a fresh sequence number and moves the state to pending.
    fn begin_request(&self) -> u64 {
        let mut inner = self.lock();
        Self::claim_request(&mut inner)
    }

    fn claim_request(inner: &mut Inner) -> u64 {
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.latest_seq = seq;
        inner.state = inner.state.apply(&AuthEvent::RequestStarted);
        seq
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
