//! Credential management across two storage tiers.
//!
//! This module provides:
//! - `Credential`: the access/refresh token pair with expiry and identity
//! - `CredentialManager`: reads and writes the pair across a durable store
//!   and an ephemeral session store, pushing identity to the shared sink
//!
//! The durable tier holds only the access token and expiry; the ephemeral
//! tier holds the richer shape for the rest of the session.

pub mod store;

pub use store::{
    format_bearer, Credential, CredentialManager, NewCredential, SESSION_KEY, TOKEN_KEY,
};
