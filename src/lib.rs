//! authgate - client-side credential lifecycle and authorization gating.
//!
//! Two cooperating components:
//! - the credential store, which persists an access/refresh token pair
//!   across a durable tier (small, TTL-bearing) and an ephemeral session
//!   tier (richer, session-bound), pushing identity fields to a shared sink
//! - the authorization gate, which fires an asynchronous server-side check
//!   for guarded navigations and redirects only on explicit denial
//!
//! Storage backends, the identity sink, the navigation layer, and the check
//! transport are all trait seams injected at construction, so hosts and
//! tests can substitute their own.

pub mod api;
pub mod config;
pub mod credential;
pub mod guard;
pub mod identity;
pub mod storage;

pub use api::{ApiClient, ApiError, AuthCheckResponse};
pub use config::AuthConfig;
pub use credential::{format_bearer, Credential, CredentialManager, NewCredential};
pub use guard::{decide, AuthGuard, Authority, Decision, RouteMeta, Router, FORBIDDEN_PATH};
pub use identity::{IdentitySink, UserStore};
pub use storage::{DurableStore, EphemeralStore, FileStore, KeyringStore, MemoryStore};
