//! Dual-tier credential persistence.
//!
//! Writes project one credential into two records: a small durable entry
//! holding the access token and its expiry, and a richer session-scoped
//! entry holding the refresh token and identity fields. Reads consult the
//! durable tier first and fall back to the session tier.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::identity::IdentitySink;
use crate::storage::{DurableStore, EphemeralStore};

/// Durable-store key for the access token record
pub const TOKEN_KEY: &str = "authorized-token";

/// Ephemeral-store key for the session record
pub const SESSION_KEY: &str = "user-info";

/// Milliseconds per day, for the durable entry's fractional-day TTL
const MS_PER_DAY: f64 = 86_400_000.0;

/// The full credential shape as seen by callers.
///
/// `expires_at` is epoch milliseconds; 0 means "no expiry". Reads from the
/// durable tier populate only `access_token`/`expires_at`; the remaining
/// fields stay at their defaults on that path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl Credential {
    pub fn is_expired(&self) -> bool {
        self.expires_at > 0 && Utc::now().timestamp_millis() > self.expires_at
    }

    /// Minutes remaining until expiry (for display); `None` when the
    /// credential carries no expiry.
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        if self.expires_at <= 0 {
            return None;
        }
        let remaining_ms = self.expires_at - Utc::now().timestamp_millis();
        Some((remaining_ms / 60_000).max(0))
    }
}

/// Input for a credential write. `username`/`roles` are optional; when either
/// is missing, both are re-derived from the previous session record.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: DateTime<Utc>,
    pub username: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Durable-tier wire record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DurableRecord {
    access_token: String,
    expires_at: i64,
}

/// Ephemeral-tier wire record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    refresh_token: String,
    expires_at: i64,
    username: String,
    roles: Vec<String>,
}

/// Manages the credential pair across both storage tiers and pushes identity
/// updates to the shared sink. All operations are synchronous; storage I/O is
/// local.
pub struct CredentialManager {
    durable: Arc<dyn DurableStore>,
    ephemeral: Arc<dyn EphemeralStore>,
    identity: Arc<dyn IdentitySink>,
}

impl CredentialManager {
    pub fn new(
        durable: Arc<dyn DurableStore>,
        ephemeral: Arc<dyn EphemeralStore>,
        identity: Arc<dyn IdentitySink>,
    ) -> Self {
        Self {
            durable,
            ephemeral,
            identity,
        }
    }

    /// Read the current credential.
    ///
    /// The durable tier wins when present: it survives longer and is the fast
    /// path at startup, though it only recovers the access token and expiry.
    /// The session tier recovers the richer shape minus the access token.
    /// Returns `Ok(None)` when neither tier has a record.
    pub fn get_credential(&self) -> Result<Option<Credential>> {
        if let Some(raw) = self.durable.get(TOKEN_KEY)? {
            let record: DurableRecord = serde_json::from_str(&raw)
                .context("Failed to parse durable credential record")?;
            return Ok(Some(Credential {
                access_token: record.access_token,
                expires_at: record.expires_at,
                ..Credential::default()
            }));
        }

        Ok(self.read_session_record()?.map(|record| Credential {
            refresh_token: record.refresh_token,
            expires_at: record.expires_at,
            username: record.username,
            roles: record.roles,
            ..Credential::default()
        }))
    }

    /// Write a credential pair to both tiers and push identity to the sink.
    ///
    /// The durable entry's TTL is derived from `expires`: a future timestamp
    /// becomes a fractional-day TTL, a non-positive one writes without an
    /// explicit TTL (session-length lifetime). An already-past `expires`
    /// yields a non-positive TTL and the store evicts the entry on the next
    /// read; that is accepted, not special-cased.
    pub fn set_credential(&self, input: NewCredential) -> Result<()> {
        let expires_at = input.expires.timestamp_millis();

        let record = DurableRecord {
            access_token: input.access_token,
            expires_at,
        };
        let serialized = serde_json::to_string(&record)
            .context("Failed to serialize durable credential record")?;
        let ttl_days = (expires_at > 0)
            .then(|| (expires_at - Utc::now().timestamp_millis()) as f64 / MS_PER_DAY);
        self.durable
            .set(TOKEN_KEY, &serialized, ttl_days)
            .context("Failed to write durable credential record")?;

        // Both identity fields supplied: use them as-is. Otherwise re-derive
        // both from the previous session record, defaulting to empty.
        let (username, roles) = match (input.username, input.roles) {
            (Some(username), Some(roles)) => (username, roles),
            _ => match self.read_session_record()? {
                Some(prior) => (prior.username, prior.roles),
                None => (String::new(), Vec::new()),
            },
        };

        self.identity.set_username(&username);
        self.identity.set_roles(&roles);

        let session = SessionRecord {
            refresh_token: input.refresh_token,
            expires_at,
            username,
            roles,
        };
        let value =
            serde_json::to_value(&session).context("Failed to serialize session record")?;
        self.ephemeral.set_item(SESSION_KEY, value);

        debug!(expires_at = expires_at, "Stored credential");
        Ok(())
    }

    /// Delete the durable entry and wipe the entire ephemeral scope.
    ///
    /// Logout invalidates all session-scoped data, not just the credential
    /// key. Safe to call when nothing is stored.
    pub fn remove_credential(&self) -> Result<()> {
        self.durable
            .remove(TOKEN_KEY)
            .context("Failed to remove durable credential record")?;
        self.ephemeral.clear();
        Ok(())
    }

    fn read_session_record(&self) -> Result<Option<SessionRecord>> {
        match self.ephemeral.get_item(SESSION_KEY) {
            Some(value) => {
                let record = serde_json::from_value(value)
                    .context("Failed to parse stored session record")?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

/// Format a token as an Authorization header value.
pub fn format_bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// ============================================================================
// Tests
// ============================================================================
