//! Credential service client module.
//!
//! This module provides the `CredentialService` trait consumed by the
//! session, the `HttpCredentialService` implementation over a REST API,
//! and the `AuthError` taxonomy for everything that can go wrong on the
//! way to the remote service.

pub mod client;
pub mod error;

pub use client::{CredentialService, HttpCredentialService};
pub use error::AuthError;
