//! Typed Retrieval Invoker (§4.11): a small dispatch enum over the two
//! retrieval shapes the runtime exposes — plain vector search and
//! vector+keyword fusion — wrapping the [`NativeBridge`] (§4.1) uniformly
//! rather than letting callers reach for table-specific methods directly.
//! Deliberately thin: it owns no storage of its own, only a backend tag, a
//! table name, and the embedding provider used to turn query text into a
//! vector.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingProvider;
use crate::errors::{Result, RuntimeError};
use crate::native_bridge::{NativeBridge, TableHealthReport};
use crate::search::{reciprocal_rank_fusion, weighted_sum_fusion, FusionMethod};
use crate::tool_index::ToolIndexRow;
use crate::vector_store::Filter;

/// Which retrieval shape a request is dispatched to (§4.11). Only these two
/// spellings are accepted; older table-specific names (`"lancedb"`,
/// `"qdrant"`, `"native"`) are rejected rather than silently aliased, since
/// they named a storage backend, not a retrieval shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalBackend {
    Vector,
    Hybrid,
}

impl RetrievalBackend {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "vector" => Ok(Self::Vector),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(RuntimeError::ConfigError(format!(
                "unknown retrieval backend '{other}': expected 'vector' or 'hybrid'"
            ))),
        }
    }
}

/// Fusion weighting for the `Hybrid` backend (§4.7 shares this shape with
/// the Hybrid Router's own fusion, but the invoker owns its own copy since
/// a retrieval call may target a different table/threshold than routing).
#[derive(Debug, Clone, Copy)]
pub struct FusionConfig {
    pub method: FusionMethod,
    pub dense_weight: f32,
    pub sparse_weight: f32,
    pub rrf_k: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self { method: FusionMethod::WeightedSum, dense_weight: 0.7, sparse_weight: 0.3, rrf_k: 60.0 }
    }
}

/// One retrieval call (§4.11).
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub table: String,
    pub query: String,
    pub top_k: usize,
    pub filter: Option<Filter>,
    /// Minimum vector-similarity score to keep a candidate (hybrid only).
    pub threshold: f32,
}

impl RetrievalRequest {
    pub fn new(table: impl Into<String>, query: impl Into<String>, top_k: usize) -> Self {
        Self { table: table.into(), query: query.into(), top_k, filter: None, threshold: 0.0 }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// One scored hit, uniform across both backends: `dense_score`/
/// `sparse_score` are populated only by `Hybrid` (§4.11, mirrors
/// `search::hybrid::HybridSearchResult`'s shape without requiring the
/// `hybrid-search` feature).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub id: String,
    pub score: f32,
    pub dense_score: Option<f32>,
    pub sparse_score: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResponse {
    pub backend: RetrievalBackend,
    pub items: Vec<RetrievedItem>,
}

/// `retriever.get_stats` output (§4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverStats {
    pub backend: RetrievalBackend,
    pub table: String,
    pub row_count: usize,
    pub embedding_dim: usize,
    pub embedding_model: String,
}

/// The dispatch enum's single concrete type: backend tag plus the
/// `NativeBridge`/`EmbeddingProvider` handles it wraps (§4.11
/// `retriever.{search, hybrid_search, index, get_stats}`).
pub struct TypedRetriever {
    backend: RetrievalBackend,
    bridge: Arc<NativeBridge>,
    embeddings: Arc<dyn EmbeddingProvider>,
    fusion: FusionConfig,
}

impl TypedRetriever {
    pub fn new(backend: RetrievalBackend, bridge: Arc<NativeBridge>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { backend, bridge, embeddings, fusion: FusionConfig::default() }
    }

    pub fn with_fusion_config(mut self, fusion: FusionConfig) -> Self {
        self.fusion = fusion;
        self
    }

    pub fn backend(&self) -> RetrievalBackend {
        self.backend
    }

    /// `retriever.search`: vector-only lookup, valid for either backend tag
    /// (a `Hybrid` retriever can still be asked for a pure vector pass,
    /// e.g. to compare against its own fused results).
    pub async fn search(&self, request: &RetrievalRequest) -> Result<RetrievalResponse> {
        let query_vector = self.embed(&request.query).await?;
        let hits = self.bridge.search_vector(&request.table, query_vector, request.top_k, request.filter.clone()).await?;
        let items = hits
            .into_iter()
            .map(|h| RetrievedItem { id: h.id, score: h.score, dense_score: Some(h.score), sparse_score: None })
            .collect();
        Ok(RetrievalResponse { backend: self.backend, items })
    }

    /// `retriever.hybrid_search`: fuses the bridge's vector and keyword
    /// candidate scans per this retriever's [`FusionConfig`] (§4.11, §4.7).
    /// Rejects the call outright when the retriever was constructed as
    /// `Vector`-only — callers asking for fusion on a vector-only retriever
    /// almost certainly mis-configured it rather than meaning to degrade
    /// silently to vector-only.
    pub async fn hybrid_search(&self, request: &RetrievalRequest) -> Result<RetrievalResponse> {
        if self.backend != RetrievalBackend::Hybrid {
            return Err(RuntimeError::ConfigError(
                "hybrid_search called on a retriever configured as 'vector'".to_string(),
            ));
        }
        let query_vector = self.embed(&request.query).await?;
        let (vector_hits, keyword_hits) = self
            .bridge
            .search_tools(&request.table, query_vector, Some(&request.query), request.top_k, request.threshold)
            .await?;

        let dense_scores: std::collections::HashMap<String, f32> = vector_hits.iter().cloned().collect();
        let sparse_scores: std::collections::HashMap<String, f32> = keyword_hits.iter().cloned().collect();

        let fused = match self.fusion.method {
            FusionMethod::ReciprocalRank => {
                reciprocal_rank_fusion(vec![("dense", vector_hits), ("sparse", keyword_hits)], self.fusion.rrf_k, request.top_k)
            }
            FusionMethod::WeightedSum | FusionMethod::MaxScore => weighted_sum_fusion(
                vec![("dense", self.fusion.dense_weight, vector_hits), ("sparse", self.fusion.sparse_weight, keyword_hits)],
                request.top_k,
            ),
        };

        let items = fused
            .into_iter()
            .map(|f| RetrievedItem {
                dense_score: dense_scores.get(&f.id).copied(),
                sparse_score: sparse_scores.get(&f.id).copied(),
                id: f.id,
                score: f.score,
            })
            .collect();
        Ok(RetrievalResponse { backend: self.backend, items })
    }

    /// `retriever.index`: embed and upsert rows through the bridge (§4.1,
    /// §4.6). Real embeddings are always computed here rather than relying
    /// on the bridge's placeholder-embedding ingestion path.
    pub async fn index(&self, rows: Vec<ToolIndexRow>) -> Result<usize> {
        let texts: Vec<String> = rows.iter().map(|r| r.content.clone()).collect();
        let embeddings = self
            .embeddings
            .embed_documents(texts)
            .await
            .map_err(|e| RuntimeError::StorageError(e.to_string()))?;
        if embeddings.len() != rows.len() {
            return Err(RuntimeError::StorageError(format!(
                "embedding provider returned {} vectors for {} rows",
                embeddings.len(),
                rows.len()
            )));
        }
        let table = rows.first().map(|r| r.skill_name.clone()).unwrap_or_default();
        let pairs: Vec<(ToolIndexRow, Vec<f32>)> = rows.into_iter().zip(embeddings).collect();
        let count = pairs.len();
        self.bridge.add_documents_with_embeddings(&table, pairs).await?;
        Ok(count)
    }

    /// `retriever.index`, explicit table (the common case: rows from many
    /// skills sharing one logical table).
    pub async fn index_into(&self, table: &str, rows: Vec<ToolIndexRow>) -> Result<usize> {
        let texts: Vec<String> = rows.iter().map(|r| r.content.clone()).collect();
        let embeddings = self
            .embeddings
            .embed_documents(texts)
            .await
            .map_err(|e| RuntimeError::StorageError(e.to_string()))?;
        if embeddings.len() != rows.len() {
            return Err(RuntimeError::StorageError(format!(
                "embedding provider returned {} vectors for {} rows",
                embeddings.len(),
                rows.len()
            )));
        }
        let pairs: Vec<(ToolIndexRow, Vec<f32>)> = rows.into_iter().zip(embeddings).collect();
        let count = pairs.len();
        self.bridge.add_documents_with_embeddings(table, pairs).await?;
        Ok(count)
    }

    /// `retriever.get_stats` (§4.11).
    pub async fn get_stats(&self, table: &str) -> RetrieverStats {
        let health: TableHealthReport = self.bridge.analyze_table_health(table).await;
        RetrieverStats {
            backend: self.backend,
            table: table.to_string(),
            row_count: health.row_count,
            embedding_dim: self.embeddings.dimensions(),
            embedding_model: self.embeddings.model_name().to_string(),
        }
    }

    async fn embed(&self, query: &str) -> Result<Vec<f32>> {
        self.embeddings.embed_query(query).await.map_err(|e| RuntimeError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_registry::SchemaRegistry;
    use crate::vector_store::InMemoryVectorStore;
    use async_trait::async_trait;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_documents(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| if t.contains("git") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
                .collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "stub"
        }

        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    fn bridge() -> Arc<NativeBridge> {
        Arc::new(NativeBridge::new(Arc::new(InMemoryVectorStore::new()), Arc::new(SchemaRegistry::new().unwrap()), 2))
    }

    fn row(skill: &str, tool: &str, content: &str) -> ToolIndexRow {
        ToolIndexRow::command_row(skill, tool, None, content, None, vec![])
    }

    #[test]
    fn test_parse_rejects_legacy_backend_names() {
        assert!(RetrievalBackend::parse("vector").is_ok());
        assert!(RetrievalBackend::parse("hybrid").is_ok());
        assert!(RetrievalBackend::parse("lancedb").is_err());
        assert!(RetrievalBackend::parse("qdrant").is_err());
    }

    #[tokio::test]
    async fn test_index_then_search_finds_nearest() {
        let retriever = TypedRetriever::new(RetrievalBackend::Vector, bridge(), Arc::new(StubEmbedder));
        retriever
            .index_into("tools", vec![row("git", "status", "git status command"), row("docker", "ps", "docker ps command")])
            .await
            .unwrap();
        let response = retriever.search(&RetrievalRequest::new("tools", "git", 5)).await.unwrap();
        assert_eq!(response.items.first().unwrap().id, "git.status");
    }

    #[tokio::test]
    async fn test_hybrid_search_rejected_on_vector_backend() {
        let retriever = TypedRetriever::new(RetrievalBackend::Vector, bridge(), Arc::new(StubEmbedder));
        let result = retriever.hybrid_search(&RetrievalRequest::new("tools", "git", 5)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_hybrid_search_fuses_vector_and_keyword() {
        let retriever = TypedRetriever::new(RetrievalBackend::Hybrid, bridge(), Arc::new(StubEmbedder));
        retriever
            .index_into("tools", vec![row("git", "status", "git status command"), row("docker", "ps", "docker ps command")])
            .await
            .unwrap();
        let response = retriever.hybrid_search(&RetrievalRequest::new("tools", "git status", 5)).await.unwrap();
        assert!(!response.items.is_empty());
        assert!(response.items.iter().any(|i| i.id == "git.status"));
    }

    #[tokio::test]
    async fn test_get_stats_reports_row_count_and_dimensions() {
        let retriever = TypedRetriever::new(RetrievalBackend::Vector, bridge(), Arc::new(StubEmbedder));
        retriever.index_into("tools", vec![row("git", "status", "git status command")]).await.unwrap();
        let stats = retriever.get_stats("tools").await;
        assert_eq!(stats.row_count, 1);
        assert_eq!(stats.embedding_dim, 2);
    }
}
