//! Navigation authorization gate.
//!
//! Intercepts a navigation intent and, when its route metadata demands it,
//! fires one asynchronous check against the remote authority. The gate never
//! blocks the caller and never explicitly allows: it only vetoes, redirecting
//! to the forbidden page on an explicit denial. Transport faults are logged
//! and swallowed - the gate fails open.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error};

use crate::api::AuthCheckResponse;

/// Redirect target on explicit denial
pub const FORBIDDEN_PATH: &str = "/error/403";

/// Route metadata consulted by the gate. The check fires when either flag is
/// set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_roles: bool,
}

impl RouteMeta {
    pub fn requires_check(&self) -> bool {
        self.requires_auth || self.requires_roles
    }
}

/// Navigation layer seam: receives the redirect target on denial.
pub trait Router: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Transport seam for the authorization check.
#[async_trait]
pub trait Authority: Send + Sync {
    async fn check_auth(&self) -> Result<AuthCheckResponse>;
}

/// Outcome of a resolved check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Map an authority response to a decision. Only `data` is consulted.
pub fn decide(response: &AuthCheckResponse) -> Decision {
    if response.data {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

pub struct AuthGuard {
    authority: Arc<dyn Authority>,
    router: Arc<dyn Router>,
}

impl AuthGuard {
    pub fn new(authority: Arc<dyn Authority>, router: Arc<dyn Router>) -> Self {
        Self { authority, router }
    }

    /// Gate a navigation intent on the remote authorization check.
    ///
    /// Returns immediately in all cases. When the route metadata requires a
    /// check, one request is spawned onto the runtime and the caller's
    /// navigation proceeds; a later explicit denial redirects after the fact.
    /// Checks triggered in quick succession are neither serialized nor
    /// deduplicated. Must be called from within a Tokio runtime.
    pub fn check_authorization(&self, route: &RouteMeta) {
        if !route.requires_check() {
            return;
        }

        let authority = Arc::clone(&self.authority);
        let router = Arc::clone(&self.router);
        tokio::spawn(async move {
            Self::run_check(authority, router).await;
        });
    }

    async fn run_check(authority: Arc<dyn Authority>, router: Arc<dyn Router>) {
        match authority.check_auth().await {
            Ok(response) => {
                if decide(&response) == Decision::Deny {
                    debug!(path = FORBIDDEN_PATH, "Authorization denied, redirecting");
                    router.redirect(FORBIDDEN_PATH);
                }
            }
            Err(e) => {
                // Fail open: a transport fault is not a denial
                error!(error = %e, "Authorization check failed");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    enum Verdict {
        Allow,
        Deny,
        Fault,
    }

    struct FakeAuthority {
        verdict: Verdict,
        calls: AtomicUsize,
    }

    impl FakeAuthority {
        fn new(verdict: Verdict) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authority for FakeAuthority {
        async fn check_auth(&self) -> Result<AuthCheckResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.verdict {
                Verdict::Allow => Ok(AuthCheckResponse {
                    success: true,
                    data: true,
                }),
                Verdict::Deny => Ok(AuthCheckResponse {
                    success: true,
                    data: false,
                }),
                Verdict::Fault => Err(anyhow::anyhow!("connection refused")),
            }
        }
    }

    #[derive(Default)]
    struct FakeRouter {
        redirects: Mutex<Vec<String>>,
    }

    impl FakeRouter {
        fn redirects(&self) -> Vec<String> {
            self.redirects.lock().clone()
        }
    }

    impl Router for FakeRouter {
        fn redirect(&self, path: &str) {
            self.redirects.lock().push(path.to_string());
        }
    }

    #[test]
    fn test_decide_consults_only_data() {
        let deny = AuthCheckResponse {
            success: true,
            data: false,
        };
        assert_eq!(decide(&deny), Decision::Deny);

        let allow = AuthCheckResponse {
            success: false,
            data: true,
        };
        assert_eq!(decide(&allow), Decision::Allow);
    }

    #[tokio::test]
    async fn test_unguarded_route_issues_no_check() {
        let authority = FakeAuthority::new(Verdict::Deny);
        let router = Arc::new(FakeRouter::default());
        let guard = AuthGuard::new(authority.clone(), router.clone());

        guard.check_authorization(&RouteMeta::default());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(authority.calls(), 0);
        assert!(router.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_denial_redirects_to_forbidden() {
        let authority = FakeAuthority::new(Verdict::Deny);
        let router = Arc::new(FakeRouter::default());

        AuthGuard::run_check(authority.clone(), router.clone()).await;

        assert_eq!(authority.calls(), 1);
        assert_eq!(router.redirects(), vec![FORBIDDEN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_allow_does_not_redirect() {
        let authority = FakeAuthority::new(Verdict::Allow);
        let router = Arc::new(FakeRouter::default());

        AuthGuard::run_check(authority.clone(), router.clone()).await;

        assert_eq!(authority.calls(), 1);
        assert!(router.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_transport_fault_fails_open() {
        let authority = FakeAuthority::new(Verdict::Fault);
        let router = Arc::new(FakeRouter::default());

        AuthGuard::run_check(authority.clone(), router.clone()).await;

        assert_eq!(authority.calls(), 1);
        assert!(router.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_guarded_route_fires_detached_check() {
        let authority = FakeAuthority::new(Verdict::Deny);
        let router = Arc::new(FakeRouter::default());
        let guard = AuthGuard::new(authority.clone(), router.clone());

        guard.check_authorization(&RouteMeta {
            requires_auth: true,
            requires_roles: false,
        });

        // The caller is not blocked; the redirect lands on the event loop
        // shortly after
        for _ in 0..100 {
            if !router.redirects().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(authority.calls(), 1);
        assert_eq!(router.redirects(), vec![FORBIDDEN_PATH.to_string()]);
    }
}
