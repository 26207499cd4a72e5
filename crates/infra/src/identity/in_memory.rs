//! Deterministic identity provider for dev mode and tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use atelier_auth::{IdentityError, IdentityProvider, VerifiedIdentity};

/// Maps known credentials to fixed outcomes.
///
/// Unknown credentials are rejected, which matches how a real provider treats
/// tokens it never issued. `fail` registers an explicit outcome, e.g. an
/// [`IdentityError::Unavailable`] for outage drills.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    outcomes: RwLock<HashMap<String, Result<VerifiedIdentity, IdentityError>>>,
    calls: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, credential: impl Into<String>, identity: VerifiedIdentity) {
        self.outcomes
            .write()
            .unwrap()
            .insert(credential.into(), Ok(identity));
    }

    pub fn fail(&self, credential: impl Into<String>, error: IdentityError) {
        self.outcomes
            .write()
            .unwrap()
            .insert(credential.into(), Err(error));
    }

    /// Number of verification calls served so far. Lets tests assert the
    /// validation cache is actually short-circuiting.
    pub fn verify_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .read()
            .unwrap()
            .get(credential)
            .cloned()
            .unwrap_or_else(|| Err(IdentityError::Rejected("unknown credential".into())))
    }
}
