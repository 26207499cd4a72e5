//! Short-lived cache of verification results.
//!
//! Exists only to absorb a burst of requests presenting the same credential
//! without a provider round-trip per request. It must never extend a
//! credential's effective lifetime: entries are capped at the expiry the
//! provider itself asserted. Only fully verified identities are inserted, so
//! a request aborted mid-pipeline leaves nothing behind.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::provider::VerifiedIdentity;

type CacheKey = [u8; 32];

#[derive(Debug, Clone)]
struct CacheEntry {
    identity: VerifiedIdentity,
    valid_until: DateTime<Utc>,
}

/// Concurrent bounded-TTL map from credential digest to verified identity.
///
/// Raw credentials are never stored; keys are SHA-256 digests. Reads and
/// inserts take the lock briefly and never across a suspension point.
#[derive(Debug)]
pub struct ValidationCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ValidationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, credential: &str) -> Option<VerifiedIdentity> {
        self.get_at(credential, Utc::now())
    }

    pub fn insert(&self, credential: &str, identity: VerifiedIdentity) {
        self.insert_at(credential, identity, Utc::now());
    }

    fn key(credential: &str) -> CacheKey {
        Sha256::digest(credential.as_bytes()).into()
    }

    fn get_at(&self, credential: &str, now: DateTime<Utc>) -> Option<VerifiedIdentity> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(&Self::key(credential))?;
        if entry.valid_until > now {
            Some(entry.identity.clone())
        } else {
            None
        }
    }

    fn insert_at(&self, credential: &str, identity: VerifiedIdentity, now: DateTime<Utc>) {
        let mut valid_until = now + self.ttl;
        if let Some(expires_at) = identity.expires_at {
            valid_until = valid_until.min(expires_at);
        }
        if valid_until <= now {
            return;
        }

        let mut entries = self.entries.write().unwrap();
        // Dropping stale entries on insert keeps the map bounded to roughly
        // one TTL window of distinct credentials.
        entries.retain(|_, entry| entry.valid_until > now);
        entries.insert(Self::key(credential), CacheEntry { identity, valid_until });
    }
}
