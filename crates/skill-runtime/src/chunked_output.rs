//! Chunked output contract (§4.8): when a handler's result is too large for
//! one response, it returns `status=start` with the first batch and stashes
//! the rest in a bounded, TTL-evicted, process-local session store. The
//! caller pulls subsequent batches with `action=batch, session_id, batch_index`.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::errors::{Result, RuntimeError};

/// One pending chunked result, keyed by `session_id` (§4.8).
struct ChunkSession {
    batches: Vec<Value>,
    expires_at: Instant,
}

/// Bounded, TTL-evicted, process-local store for in-progress chunked
/// results (§5 "Session stores ... per-key locks; LRU eviction with TTL").
pub struct ChunkedOutputStore {
    ttl: Duration,
    max_sessions: usize,
    sessions: RwLock<HashMap<String, ChunkSession>>,
}

/// The first batch of a `start` response, handed back to the caller (§4.8).
pub struct StartResult {
    pub session_id: String,
    pub batch_count: usize,
    pub batch_size: usize,
    pub first_batch: Value,
}

impl ChunkedOutputStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self { ttl, max_sessions, sessions: RwLock::new(HashMap::new()) }
    }

    /// Split `batches` into a session and return the first one as `start` (§4.8).
    ///
    /// Fails with [`RuntimeError::StorageError`] if the session store is at
    /// capacity and no expired session can be evicted to make room.
    pub fn start(&self, session_id: impl Into<String>, batches: Vec<Value>) -> Result<StartResult> {
        if batches.is_empty() {
            return Err(RuntimeError::ExecutionError("chunked result must contain at least one batch".to_string()));
        }
        let session_id = session_id.into();
        let mut sessions = self.sessions.write().unwrap();
        self.evict_expired(&mut sessions);
        if sessions.len() >= self.max_sessions && !sessions.contains_key(&session_id) {
            return Err(RuntimeError::StorageError("chunked output session store at capacity".to_string()));
        }
        let batch_count = batches.len();
        let batch_size = batches.first().map(|b| estimate_size(b)).unwrap_or(0);
        let first_batch = batches[0].clone();
        sessions.insert(
            session_id.clone(),
            ChunkSession { batches, expires_at: Instant::now() + self.ttl },
        );
        Ok(StartResult { session_id, batch_count, batch_size, first_batch })
    }

    /// Pull batch `batch_index` of `session_id` (§4.8). Refreshes the TTL on
    /// every successful pull so a slow consumer doesn't lose its session
    /// mid-stream.
    pub fn batch(&self, session_id: &str, batch_index: usize) -> Result<Value> {
        let mut sessions = self.sessions.write().unwrap();
        self.evict_expired(&mut sessions);
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| RuntimeError::ExecutionError(format!("unknown or expired chunk session: {session_id}")))?;
        let batch = session
            .batches
            .get(batch_index)
            .cloned()
            .ok_or_else(|| RuntimeError::InvalidParams {
                tool: "chunked_output.batch".to_string(),
                reason: format!("batch_index {batch_index} out of range"),
            })?;
        session.expires_at = Instant::now() + self.ttl;
        Ok(batch)
    }

    fn evict_expired(&self, sessions: &mut HashMap<String, ChunkSession>) {
        let now = Instant::now();
        sessions.retain(|_, s| s.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn estimate_size(value: &Value) -> usize {
    serde_json::to_string(value).map(|s| s.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_then_pull_all_batches() {
        let store = ChunkedOutputStore::new(Duration::from_secs(60), 16);
        let result = store.start("sess-1", vec![json!({"i": 0}), json!({"i": 1}), json!({"i": 2})]).unwrap();
        assert_eq!(result.batch_count, 3);
        assert_eq!(result.first_batch, json!({"i": 0}));
        assert_eq!(store.batch("sess-1", 1).unwrap(), json!({"i": 1}));
        assert_eq!(store.batch("sess-1", 2).unwrap(), json!({"i": 2}));
    }

    #[test]
    fn test_unknown_session_errors() {
        let store = ChunkedOutputStore::new(Duration::from_secs(60), 16);
        assert!(store.batch("missing", 0).is_err());
    }

    #[test]
    fn test_out_of_range_batch_index_errors() {
        let store = ChunkedOutputStore::new(Duration::from_secs(60), 16);
        store.start("sess-1", vec![json!(1)]).unwrap();
        assert!(store.batch("sess-1", 5).is_err());
    }

    #[test]
    fn test_ttl_expiry_evicts_session() {
        let store = ChunkedOutputStore::new(Duration::from_millis(10), 16);
        store.start("sess-1", vec![json!(1)]).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(store.batch("sess-1", 0).is_err());
    }

    #[test]
    fn test_capacity_limit_rejects_new_sessions() {
        let store = ChunkedOutputStore::new(Duration::from_secs(60), 1);
        store.start("sess-1", vec![json!(1)]).unwrap();
        assert!(store.start("sess-2", vec![json!(1)]).is_err());
    }

    #[test]
    fn test_empty_batches_rejected() {
        let store = ChunkedOutputStore::new(Duration::from_secs(60), 16);
        assert!(store.start("sess-1", vec![]).is_err());
    }
}
