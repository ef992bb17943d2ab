//! Client-side authentication session management.
//!
//! `authgate` tracks an authentication token and the status of in-flight
//! credential service calls for a single process-local session. State is
//! seeded from a durable [`TokenStore`] at construction, mutated through a
//! small typed state machine, and exposed to consumers as
//! `{ token, is_loading, error }` snapshots.
//!
//! The two external collaborators are injected rather than looked up:
//!
//! - [`CredentialService`] performs credential exchange (`sign_in`) and
//!   token validation (`verify_token`); [`HttpCredentialService`] is the
//!   shipped HTTP implementation.
//! - [`TokenStore`] persists the token under a fixed key; file, OS keychain,
//!   and in-memory backends are provided.
//!
//! Service failures are never propagated past the session boundary - they
//! land in the `error` field of the state.
//!
//! ```no_run
//! use std::sync::Arc;
//! use authgate::{AuthSession, HttpCredentialService, MemoryTokenStore};
//!
//! # async fn demo() -> Result<(), authgate::AuthError> {
//! let store = Arc::new(MemoryTokenStore::new());
//! let service = Arc::new(HttpCredentialService::new("https://auth.example.com")?);
//! let session = AuthSession::new(store, service);
//!
//! // Re-verify a persisted token, if one was found.
//! session.resume().await;
//!
//! session.log_in("user", "secret").await;
//! if session.is_authenticated() {
//!     println!("token: {}", session.token());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod store;

pub use api::{AuthError, CredentialService, HttpCredentialService};
pub use auth::{AuthEvent, AuthSession, AuthState, AuthStatus, TOKEN_KEY};
pub use config::Config;
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
