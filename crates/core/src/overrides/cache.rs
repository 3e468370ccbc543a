//! Keyed cache seam and override cache-key derivation.
//!
//! Readers of effective quiz settings cache resolved override data under a
//! deterministic per-scope key. The engine never populates that cache; it
//! only deletes the affected key after every write so readers repopulate
//! lazily from fresh state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::DbId;

use super::model::OverrideScope;

/// Cache key for one (quiz, scope) pair.
///
/// `"{quiz}_u_{user}"` for user scopes, `"{quiz}_g_{group}"` for groups.
pub fn scope_cache_key(quiz_id: DbId, scope: OverrideScope) -> String {
    match scope {
        OverrideScope::User(user_id) => format!("{quiz_id}_u_{user_id}"),
        OverrideScope::Group(group_id) => format!("{quiz_id}_g_{group_id}"),
    }
}

/// A generic keyed JSON cache.
///
/// Delivery faults are an implementation concern; all operations are
/// infallible from the caller's perspective and `delete` of an absent key
/// is a no-op.
#[async_trait]
pub trait OverrideCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<serde_json::Value>;
    async fn set(&self, key: &str, value: serde_json::Value);
    async fn delete(&self, key: &str);
}

/// In-process cache over a `tokio` read/write lock.
///
/// The default cache for single-process deployments and tests. Multi-node
/// deployments substitute a shared backend behind the same trait.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OverrideCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: serde_json::Value) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
