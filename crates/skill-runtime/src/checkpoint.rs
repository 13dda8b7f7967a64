//! Checkpoint Store (§4.9): a thin, schema-validated wrapper over the native
//! bridge's checkpoint table. Rows for a thread form a chain ordered by
//! timestamp; `parent_id` links to the prior checkpoint (§3).
//!
//! Concurrency: writes to different `thread_id`s may proceed in parallel;
//! writes within one thread serialize (§4.9, §5). Reads never block writes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{Result, RuntimeError};
use crate::schema_registry::{SchemaName, SchemaRegistry};

/// A single checkpoint row (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub checkpoint_id: String,
    pub thread_id: String,
    /// Finite float timestamp, monotonically increasing within a thread.
    pub timestamp: f64,
    /// Opaque JSON-encoded workflow state slice.
    pub content: String,
    pub parent_id: Option<String>,
    /// Fixed-dim embedding; length must equal the configured embedding dim.
    pub embedding: Option<Vec<f32>>,
    pub metadata: Option<String>,
}

impl CheckpointRecord {
    /// Build a canonical payload for validation against the checkpoint schema.
    pub fn to_payload(&self) -> Value {
        serde_json::json!({
            "checkpoint_id": self.checkpoint_id,
            "thread_id": self.thread_id,
            "timestamp": self.timestamp,
            "content": self.content,
            "parent_id": self.parent_id,
            "embedding": self.embedding,
            "metadata": self.metadata,
        })
    }

    /// Structural invariants beyond what JSON-schema can express (§8):
    /// `parent_id != checkpoint_id`, timestamp finite, embedding dim match.
    fn check_invariants(&self, expected_dim: Option<usize>) -> std::result::Result<(), String> {
        if self.parent_id.as_deref() == Some(self.checkpoint_id.as_str()) {
            return Err("parent_id must not equal checkpoint_id".to_string());
        }
        if !self.timestamp.is_finite() {
            return Err("timestamp must be finite".to_string());
        }
        if let (Some(dim), Some(embedding)) = (expected_dim, &self.embedding) {
            if embedding.len() != dim {
                return Err(format!(
                    "embedding dim {} does not match configured dim {dim}",
                    embedding.len()
                ));
            }
        }
        Ok(())
    }
}

/// Backend storage for checkpoints, implemented by the Native Bridge (§4.1)
/// or, for tests, an in-memory map.
#[async_trait]
pub trait CheckpointBackend: Send + Sync {
    async fn append(&self, record: CheckpointRecord) -> Result<()>;
    async fn latest(&self, thread_id: &str) -> Result<Option<CheckpointRecord>>;
    async fn list(&self, thread_id: &str, limit: Option<usize>) -> Result<Vec<CheckpointRecord>>;
}

/// In-memory backend, used by default and by tests; append-only per thread.
#[derive(Default)]
pub struct InMemoryCheckpointBackend {
    threads: RwLock<HashMap<String, Vec<CheckpointRecord>>>,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryCheckpointBackend {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, thread_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl CheckpointBackend for InMemoryCheckpointBackend {
    async fn append(&self, record: CheckpointRecord) -> Result<()> {
        let lock = self.lock_for(&record.thread_id).await;
        let _guard = lock.lock().await;
        let mut threads = self.threads.write().await;
        threads.entry(record.thread_id.clone()).or_default().push(record);
        Ok(())
    }

    async fn latest(&self, thread_id: &str) -> Result<Option<CheckpointRecord>> {
        let threads = self.threads.read().await;
        Ok(threads
            .get(thread_id)
            .and_then(|rows| rows.iter().max_by(|a, b| a.timestamp.total_cmp(&b.timestamp)))
            .cloned())
    }

    async fn list(&self, thread_id: &str, limit: Option<usize>) -> Result<Vec<CheckpointRecord>> {
        let threads = self.threads.read().await;
        let mut rows: Vec<CheckpointRecord> = threads.get(thread_id).cloned().unwrap_or_default();
        rows.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        // Keep the most recent `limit` rows, not the oldest: drop from the
        // front rather than truncating the tail, preserving ascending order.
        if let Some(limit) = limit {
            if rows.len() > limit {
                let start = rows.len() - limit;
                rows = rows.split_off(start);
            }
        }
        Ok(rows)
    }
}

/// The Checkpoint Store (§4.9): validates on write, reads the latest by
/// timestamp, lists a thread's chain in order.
pub struct CheckpointStore<B: CheckpointBackend = InMemoryCheckpointBackend> {
    backend: B,
    schemas: Arc<SchemaRegistry>,
    embedding_dim: Option<usize>,
}

impl<B: CheckpointBackend> CheckpointStore<B> {
    pub fn new(backend: B, schemas: Arc<SchemaRegistry>, embedding_dim: Option<usize>) -> Self {
        Self { backend, schemas, embedding_dim }
    }

    /// `aput`: build a canonical payload, validate it, then append.
    pub async fn aput(&self, record: CheckpointRecord) -> Result<()> {
        record
            .check_invariants(self.embedding_dim)
            .map_err(|message| RuntimeError::SchemaValidationError { pointer: "".to_string(), message })?;
        self.schemas.validate(SchemaName::Checkpoint, &record.to_payload())?;
        self.backend.append(record).await
    }

    /// `aget_tuple`: latest checkpoint for a thread, if any.
    pub async fn aget_tuple(&self, thread_id: &str) -> Result<Option<CheckpointRecord>> {
        self.backend.latest(thread_id).await
    }

    /// `alist`: the thread's full chain (or the most recent `limit`), timestamp-ordered.
    pub async fn alist(&self, thread_id: &str, limit: Option<usize>) -> Result<Vec<CheckpointRecord>> {
        self.backend.list(thread_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, thread: &str, ts: f64, parent: Option<&str>) -> CheckpointRecord {
        CheckpointRecord {
            checkpoint_id: id.to_string(),
            thread_id: thread.to_string(),
            timestamp: ts,
            content: "{}".to_string(),
            parent_id: parent.map(|p| p.to_string()),
            embedding: None,
            metadata: None,
        }
    }

    async fn store() -> CheckpointStore {
        CheckpointStore::new(
            InMemoryCheckpointBackend::new(),
            Arc::new(SchemaRegistry::new().unwrap()),
            None,
        )
    }

    #[tokio::test]
    async fn test_checkpoint_chain_ordering() {
        let store = store().await;
        for i in 0..10 {
            let parent = if i == 0 { None } else { Some(format!("cp-{}", i - 1)) };
            store
                .aput(rec(&format!("cp-{i}"), "T", i as f64, parent.as_deref()))
                .await
                .unwrap();
        }
        let latest = store.aget_tuple("T").await.unwrap().unwrap();
        assert_eq!(latest.checkpoint_id, "cp-9");

        let all = store.alist("T", None).await.unwrap();
        assert_eq!(all.len(), 10);
        for i in 1..10 {
            assert_eq!(all[i].parent_id.as_deref(), Some(all[i - 1].checkpoint_id.as_str()));
        }
    }

    #[tokio::test]
    async fn test_thread_isolation() {
        let store = store().await;
        store.aput(rec("a1", "A", 1.0, None)).await.unwrap();
        store.aput(rec("b1", "B", 1.0, None)).await.unwrap();
        let a_list = store.alist("A", None).await.unwrap();
        let b_list = store.alist("B", None).await.unwrap();
        assert!(a_list.iter().all(|r| r.thread_id == "A"));
        assert!(b_list.iter().all(|r| r.thread_id == "B"));
    }

    #[tokio::test]
    async fn test_parent_equals_self_rejected() {
        let store = store().await;
        let err = store.aput(rec("cp-1", "T", 1.0, Some("cp-1"))).await.unwrap_err();
        assert!(matches!(err, RuntimeError::SchemaValidationError { .. }));
    }

    #[tokio::test]
    async fn test_nonfinite_timestamp_rejected() {
        let store = store().await;
        let mut r = rec("cp-1", "T", f64::NAN, None);
        r.timestamp = f64::INFINITY;
        let err = store.aput(r).await.unwrap_err();
        assert!(matches!(err, RuntimeError::SchemaValidationError { .. }));
    }

    #[tokio::test]
    async fn test_embedding_dim_mismatch_rejected() {
        let store = CheckpointStore::new(
            InMemoryCheckpointBackend::new(),
            Arc::new(SchemaRegistry::new().unwrap()),
            Some(4),
        );
        let mut r = rec("cp-1", "T", 1.0, None);
        r.embedding = Some(vec![0.1, 0.2]);
        let err = store.aput(r).await.unwrap_err();
        assert!(matches!(err, RuntimeError::SchemaValidationError { .. }));
    }

    #[tokio::test]
    async fn test_empty_thread_returns_none() {
        let store = store().await;
        assert!(store.aget_tuple("missing").await.unwrap().is_none());
        assert!(store.alist("missing", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_alist_limit_returns_most_recent() {
        let store = store().await;
        for i in 0..10 {
            let parent = if i == 0 { None } else { Some(format!("cp-{}", i - 1)) };
            store
                .aput(rec(&format!("cp-{i}"), "T", i as f64, parent.as_deref()))
                .await
                .unwrap();
        }
        let recent = store.alist("T", Some(3)).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|r| r.checkpoint_id.as_str()).collect();
        assert_eq!(ids, vec!["cp-7", "cp-8", "cp-9"]);
    }
}
