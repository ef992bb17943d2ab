//! Authentication session management.
//!
//! This module provides:
//! - `AuthState` / `AuthEvent`: a pure state machine over token, loading
//!   flag, and last error
//! - `AuthSession`: a shared handle that dispatches events around
//!   credential service calls and token persistence
//!
//! The session never throws service failures at its callers; they surface
//! through the `error` field of the state.

pub mod session;
pub mod state;

pub use session::{AuthSession, TOKEN_KEY};
pub use state::{AuthEvent, AuthState, AuthStatus};
