//! Pure authentication state machine.
//!
//! State transitions are expressed as a typed event set applied through
//! [`AuthState::apply`], independent of any service calls or persistence.
//! The session layer decides *when* to emit events; this module decides
//! *what* they mean.

use serde::{Deserialize, Serialize};

/// Snapshot of the authentication state visible to consumers.
///
/// An empty `token` means unauthenticated; an empty `error` means no error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthState {
    /// Opaque credential proving authentication, empty when logged out.
    pub token: String,
    /// True while exactly one credential service call is outstanding.
    pub is_loading: bool,
    /// Message from the last failed call, cleared when a call starts or succeeds.
    pub error: String,
}

/// Coarse classification of an [`AuthState`].
///
/// `Authenticated` and `Failed` are distinguished only by field content;
/// every status can transition back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Idle,
    Pending,
    Authenticated,
    Failed,
}

/// Events that mutate the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A credential service call started.
    RequestStarted,
    /// A sign-in or verification settled successfully with this token.
    Authenticated(String),
    /// A call settled with a failure message.
    RequestFailed(String),
    /// The user logged out.
    LoggedOut,
}

impl AuthState {
    /// Initial state seeded from a persisted token (empty if none was stored).
    pub fn seeded(token: String) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Applies an event, returning the next state.
    pub fn apply(&self, event: &AuthEvent) -> AuthState {
        match event {
            AuthEvent::RequestStarted => AuthState {
                token: self.token.clone(),
                is_loading: true,
                error: String::new(),
            },
            AuthEvent::Authenticated(token) => AuthState {
                token: token.clone(),
                is_loading: false,
                error: String::new(),
            },
            // A failed re-verification keeps the in-memory token; a non-empty
            // error marks it as not fully trusted.
            AuthEvent::RequestFailed(message) => AuthState {
                token: self.token.clone(),
                is_loading: false,
                error: message.clone(),
            },
            AuthEvent::LoggedOut => AuthState::default(),
        }
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Pending
        } else if !self.error.is_empty() {
            AuthStatus::Failed
        } else if !self.token.is_empty() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Idle
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        let state = AuthState::default();
        assert_eq!(state.token, "");
        assert!(!state.is_loading);
        assert_eq!(state.error, "");
        assert_eq!(state.status(), AuthStatus::Idle);
    }

    #[test]
    fn seeded_state_is_authenticated() {
        let state = AuthState::seeded("tok".to_string());
        assert_eq!(state.token, "tok");
        assert_eq!(state.status(), AuthStatus::Authenticated);
    }

    #[test]
    fn request_started_clears_error_and_keeps_token() {
        let state = AuthState {
            token: "tok".to_string(),
            is_loading: false,
            error: "boom".to_string(),
        };
        let next = state.apply(&AuthEvent::RequestStarted);
        assert_eq!(next.token, "tok");
        assert!(next.is_loading);
        assert_eq!(next.error, "");
        assert_eq!(next.status(), AuthStatus::Pending);
    }

    #[test]
    fn authenticated_sets_token_and_clears_error() {
        let state = AuthState::default().apply(&AuthEvent::RequestStarted);
        let next = state.apply(&AuthEvent::Authenticated("tok".to_string()));
        assert_eq!(next.token, "tok");
        assert!(!next.is_loading);
        assert_eq!(next.error, "");
        assert!(next.is_authenticated());
    }

    #[test]
    fn request_failed_keeps_token_and_records_message() {
        let state = AuthState::seeded("tok".to_string()).apply(&AuthEvent::RequestStarted);
        let next = state.apply(&AuthEvent::RequestFailed("expired".to_string()));
        assert_eq!(next.token, "tok");
        assert!(!next.is_loading);
        assert_eq!(next.error, "expired");
        assert_eq!(next.status(), AuthStatus::Failed);
        assert!(!next.is_authenticated());
    }

    #[test]
    fn logged_out_clears_everything() {
        let state = AuthState {
            token: "tok".to_string(),
            is_loading: true,
            error: "boom".to_string(),
        };
        let next = state.apply(&AuthEvent::LoggedOut);
        assert_eq!(next, AuthState::default());
    }

    #[test]
    fn failed_state_can_start_a_new_request() {
        let failed = AuthState::default()
            .apply(&AuthEvent::RequestStarted)
            .apply(&AuthEvent::RequestFailed("boom".to_string()));
        let retried = failed.apply(&AuthEvent::RequestStarted);
        assert_eq!(retried.status(), AuthStatus::Pending);
        assert_eq!(retried.error, "");
    }
}
