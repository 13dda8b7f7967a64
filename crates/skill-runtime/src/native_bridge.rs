//! Native Bridge (§4.1): the uniform async handle over the vector store,
//! keyword index, relationship graph, and checkpoint table. This is the
//! only component that touches physical storage — everything else (the
//! router, the tool index, the workflow engine) goes through it.
//!
//! Concurrency: writes serialize per logical table; reads are lock-free
//! snapshots over a cloned `Vec`/`Arc` (§4.1, §5). The Arrow IPC path
//! (`search_vector_ipc`, `list_all_tools_arrow`) avoids per-row JSON
//! parsing on the hot ranking path.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tokio::sync::RwLock;

use crate::checkpoint::{CheckpointBackend, CheckpointRecord, CheckpointStore, InMemoryCheckpointBackend};
use crate::errors::{Result, RuntimeError};
use crate::schema_registry::SchemaRegistry;
use crate::tool_index::{RelationshipGraph, RelationshipGraphFile, RowType, ToolIndexRow};
use crate::vector_store::{
    DeleteStats, DocumentMetadata, EmbeddedDocument, Filter, HealthStatus, SearchResult, UpsertStats,
    VectorStore,
};

/// The logical "table" tag used to partition one physical [`VectorStore`]
/// into multiple named tables (tool index, per-workflow checkpoints, ...).
/// Spec §4.1/§6 allow "one or many tables (one per logical store)"; this
/// bridge implements the single-physical-store case and uses a metadata
/// tag for multiplexing rather than standing up a second storage engine.
const TABLE_TAG: &str = "table";

fn tag_filter(table: &str, mut filter: Filter) -> Filter {
    filter.custom.insert(TABLE_TAG.to_string(), table.to_string());
    filter
}

fn tag_document(table: &str, mut doc: EmbeddedDocument) -> EmbeddedDocument {
    doc.metadata.custom.insert(TABLE_TAG.to_string(), table.to_string());
    doc
}

/// Pluggable keyword backend (§4.1: "a per-table checkpoint write path" and
/// "keyword index (`fts` or Tantivy-class)"). When the `hybrid-search`
/// feature is enabled, [`NativeBridge::new`] wires in [`TantivyKeywordIndex`],
/// which adapts `search::bm25::BM25Index` to this trait; otherwise it falls
/// back to [`SimpleKeywordIndex`], an in-process term-overlap scorer that
/// keeps the bridge testable without tantivy.
pub trait KeywordBackend: Send + Sync {
    fn index_document(&mut self, table: &str, id: &str, content: &str);
    fn remove_document(&mut self, table: &str, id: &str);
    fn search(&self, table: &str, query: &str, k: usize) -> Vec<(String, f32)>;
    fn document_count(&self, table: &str) -> usize;
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Tantivy-backed [`KeywordBackend`]: one `BM25Index` (see `search::bm25`)
/// per logical table. This is the bridge's keyword backend whenever the
/// `hybrid-search` feature is enabled (§4.1 "keyword index (`fts` or
/// Tantivy-class)").
#[cfg(feature = "hybrid-search")]
#[derive(Default)]
pub struct TantivyKeywordIndex {
    tables: HashMap<String, crate::search::BM25Index>,
}

#[cfg(feature = "hybrid-search")]
impl TantivyKeywordIndex {
    fn table_mut(&mut self, table: &str) -> &mut crate::search::BM25Index {
        self.tables.entry(table.to_string()).or_insert_with(|| {
            crate::search::BM25Index::new(crate::search::BM25Config::in_memory())
                .expect("in-memory tantivy index construction does not fail")
        })
    }
}

#[cfg(feature = "hybrid-search")]
impl KeywordBackend for TantivyKeywordIndex {
    fn index_document(&mut self, table: &str, id: &str, content: &str) {
        let index = self.table_mut(table);
        // Re-indexing an id already present requires a delete first;
        // tantivy has no upsert-by-term for stored documents.
        let _ = index.delete_document(id);
        if index.add_document(id, id, id, content, content).is_ok() {
            if let Err(error) = index.commit() {
                tracing::warn!(table, id, %error, "failed to commit keyword index document");
            }
        }
    }

    fn remove_document(&mut self, table: &str, id: &str) {
        if let Some(index) = self.tables.get_mut(table) {
            if let Err(error) = index.delete_document(id) {
                tracing::warn!(table, id, %error, "failed to delete keyword index document");
            }
        }
    }

    fn search(&self, table: &str, query: &str, k: usize) -> Vec<(String, f32)> {
        let Some(index) = self.tables.get(table) else { return Vec::new() };
        match index.search(query, k) {
            Ok(hits) => hits.into_iter().map(|hit| (hit.id, hit.score)).collect(),
            Err(error) => {
                tracing::warn!(table, query, %error, "keyword search failed");
                Vec::new()
            }
        }
    }

    fn document_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|index| index.document_count() as usize).unwrap_or(0)
    }
}

/// Feature-off fallback [`KeywordBackend`]: per-table inverted index scored
/// by a BM25-lite formula (term overlap weighted by inverse document
/// frequency, normalized by document length). Grounded in the shape of
/// `search/bm25.rs`'s `BM25Config` (`k1`/`b`) without requiring tantivy; used
/// when the `hybrid-search` feature is disabled.
#[derive(Default)]
pub struct SimpleKeywordIndex {
    tables: HashMap<String, TableIndex>,
}

#[derive(Default)]
struct TableIndex {
    documents: HashMap<String, Vec<String>>,
    k1: f32,
    b: f32,
}

impl TableIndex {
    fn new() -> Self {
        Self { documents: HashMap::new(), k1: 1.2, b: 0.75 }
    }

    fn avg_len(&self) -> f32 {
        if self.documents.is_empty() {
            return 0.0;
        }
        let total: usize = self.documents.values().map(|d| d.len()).sum();
        total as f32 / self.documents.len() as f32
    }

    fn doc_freq(&self, term: &str) -> usize {
        self.documents.values().filter(|terms| terms.contains(&term.to_string())).count()
    }

    fn score(&self, id: &str, terms: &[String], query_terms: &[String]) -> f32 {
        let n = self.documents.len().max(1) as f32;
        let avg_len = self.avg_len().max(1.0);
        let len = terms.len() as f32;
        let mut score = 0.0;
        for q in query_terms {
            let tf = terms.iter().filter(|t| *t == q).count() as f32;
            if tf == 0.0 {
                continue;
            }
            let df = self.doc_freq(q).max(1) as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let numerator = tf * (self.k1 + 1.0);
            let denominator = tf + self.k1 * (1.0 - self.b + self.b * len / avg_len);
            score += idf * numerator / denominator;
        }
        let _ = id;
        score
    }
}

impl KeywordBackend for SimpleKeywordIndex {
    fn index_document(&mut self, table: &str, id: &str, content: &str) {
        let index = self.tables.entry(table.to_string()).or_insert_with(TableIndex::new);
        index.documents.insert(id.to_string(), tokenize(content));
    }

    fn remove_document(&mut self, table: &str, id: &str) {
        if let Some(index) = self.tables.get_mut(table) {
            index.documents.remove(id);
        }
    }

    fn search(&self, table: &str, query: &str, k: usize) -> Vec<(String, f32)> {
        let Some(index) = self.tables.get(table) else { return Vec::new() };
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(String, f32)> = index
            .documents
            .iter()
            .map(|(id, terms)| (id.clone(), index.score(id, terms, &query_terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    fn document_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.documents.len()).unwrap_or(0)
    }
}

/// Column/type distribution analytics over a table's rows (§4.1
/// `analyze_table_health`, §10.4 "table-health analytics"), modeled after
/// PyArrow-style distribution analysis over an Arrow `RecordBatch`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableHealthReport {
    pub table: String,
    pub row_count: usize,
    pub null_counts: HashMap<String, usize>,
    pub distinct_skill_count: usize,
    pub distinct_category_count: usize,
    pub row_type_counts: HashMap<String, usize>,
}

/// The Native Bridge (§4.1).
pub struct NativeBridge {
    vector_store: Arc<dyn VectorStore>,
    keyword_index: RwLock<Box<dyn KeywordBackend>>,
    tool_index_rows: RwLock<HashMap<String, Vec<ToolIndexRow>>>,
    relationship_graph: RwLock<RelationshipGraph>,
    checkpoints: CheckpointStore<InMemoryCheckpointBackend>,
    embedding_dim: usize,
}

impl NativeBridge {
    pub fn new(vector_store: Arc<dyn VectorStore>, schemas: Arc<SchemaRegistry>, embedding_dim: usize) -> Self {
        #[cfg(feature = "hybrid-search")]
        let keyword_index: Box<dyn KeywordBackend> = Box::new(TantivyKeywordIndex::default());
        #[cfg(not(feature = "hybrid-search"))]
        let keyword_index: Box<dyn KeywordBackend> = Box::new(SimpleKeywordIndex::default());

        Self {
            vector_store,
            keyword_index: RwLock::new(keyword_index),
            tool_index_rows: RwLock::new(HashMap::new()),
            relationship_graph: RwLock::new(RelationshipGraph::new()),
            checkpoints: CheckpointStore::new(InMemoryCheckpointBackend::new(), schemas, Some(embedding_dim)),
            embedding_dim,
        }
    }

    /// `create_index(table, dim)`: fatal at startup if `dim` disagrees with
    /// the bridge's configured embedding dimension (§4.1 "Failure semantics").
    pub fn create_index(&self, _table: &str, dim: usize) -> Result<()> {
        if dim != self.embedding_dim {
            return Err(RuntimeError::StorageError(format!(
                "embedding dimension mismatch: store configured for {}, index requested {dim}",
                self.embedding_dim
            )));
        }
        Ok(())
    }

    /// `add_documents`: upsert into the vector store, the keyword index,
    /// and the in-memory row cache for `table`, tagged so later table-scoped
    /// reads only see their own rows.
    pub async fn add_documents(&self, table: &str, rows: Vec<ToolIndexRow>) -> Result<UpsertStats> {
        let mut docs = Vec::with_capacity(rows.len());
        {
            let mut keyword_index = self.keyword_index.write().await;
            for row in &rows {
                keyword_index.index_document(table, &row.id, &row.content);
                let metadata = DocumentMetadata {
                    skill_name: Some(row.skill_name.clone()),
                    tool_name: row.tool_name.clone(),
                    category: row.category.clone(),
                    ..Default::default()
                };
                // Placeholder embedding: callers that have a real embedding
                // provider should call `add_documents_with_embeddings`
                // instead. Kept so ingestion can register rows before an
                // embedding pass completes (two-phase ingest, §4.6).
                let doc = tag_document(table, EmbeddedDocument::with_metadata(row.id.clone(), vec![0.0; self.embedding_dim], metadata));
                docs.push(doc);
            }
        }
        let stats = self.vector_store.upsert(docs).await.map_err(|e| RuntimeError::StorageError(e.to_string()))?;
        let mut index_rows = self.tool_index_rows.write().await;
        let table_rows = index_rows.entry(table.to_string()).or_default();
        for row in rows {
            table_rows.retain(|r| r.id != row.id);
            table_rows.push(row);
        }
        Ok(stats)
    }

    /// Same as [`Self::add_documents`] but with real embeddings already computed.
    pub async fn add_documents_with_embeddings(
        &self,
        table: &str,
        rows_and_embeddings: Vec<(ToolIndexRow, Vec<f32>)>,
    ) -> Result<UpsertStats> {
        let mut docs = Vec::with_capacity(rows_and_embeddings.len());
        let mut rows = Vec::with_capacity(rows_and_embeddings.len());
        {
            let mut keyword_index = self.keyword_index.write().await;
            for (row, embedding) in rows_and_embeddings {
                if embedding.len() != self.embedding_dim {
                    return Err(RuntimeError::StorageError(format!(
                        "embedding dim {} does not match configured dim {}",
                        embedding.len(),
                        self.embedding_dim
                    )));
                }
                keyword_index.index_document(table, &row.id, &row.content);
                let metadata = DocumentMetadata {
                    skill_name: Some(row.skill_name.clone()),
                    tool_name: row.tool_name.clone(),
                    category: row.category.clone(),
                    ..Default::default()
                };
                docs.push(tag_document(table, EmbeddedDocument::with_metadata(row.id.clone(), embedding, metadata).with_content(row.content.clone())));
                rows.push(row);
            }
        }
        let stats = self.vector_store.upsert(docs).await.map_err(|e| RuntimeError::StorageError(e.to_string()))?;
        let mut index_rows = self.tool_index_rows.write().await;
        let table_rows = index_rows.entry(table.to_string()).or_default();
        for row in rows {
            table_rows.retain(|r| r.id != row.id);
            table_rows.push(row);
        }
        Ok(stats)
    }

    /// `search_vector(table, query_vector, k, filter?)`.
    pub async fn search_vector(
        &self,
        table: &str,
        query_vector: Vec<f32>,
        k: usize,
        filter: Option<Filter>,
    ) -> Result<Vec<SearchResult>> {
        let filter = tag_filter(table, filter.unwrap_or_default());
        self.vector_store
            .search(query_vector, Some(filter), k)
            .await
            .map_err(|e| RuntimeError::StorageError(e.to_string()))
    }

    /// `search_vector_ipc`: same as [`Self::search_vector`], Arrow-IPC encoded.
    pub async fn search_vector_ipc(
        &self,
        table: &str,
        query_vector: Vec<f32>,
        k: usize,
        filter: Option<Filter>,
    ) -> Result<Vec<u8>> {
        let results = self.search_vector(table, query_vector, k, filter).await?;
        encode_search_results_ipc(&results)
    }

    /// `search_tools(table, q_vec, q_text?, k, threshold)`: fused
    /// vector + keyword candidate scan. Returns raw per-source scores; the
    /// Hybrid Router (§4.7) is responsible for fusion weighting.
    pub async fn search_tools(
        &self,
        table: &str,
        q_vec: Vec<f32>,
        q_text: Option<&str>,
        k: usize,
        threshold: f32,
    ) -> Result<(Vec<(String, f32)>, Vec<(String, f32)>)> {
        let vector_hits = self
            .vector_store
            .search(q_vec, Some(tag_filter(table, Filter::new())), k)
            .await
            .map_err(|e| RuntimeError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|r| r.score >= threshold)
            .map(|r| (r.id, r.score))
            .collect();
        let keyword_hits = match q_text {
            Some(text) => self.keyword_index.read().await.search(table, text, k),
            None => Vec::new(),
        };
        Ok((vector_hits, keyword_hits))
    }

    /// `list_all(table)`: every row cached for `table` (the tool-index
    /// table is the single source of truth consulted at startup, §3).
    pub async fn list_all(&self, table: &str) -> Vec<ToolIndexRow> {
        self.tool_index_rows.read().await.get(table).cloned().unwrap_or_default()
    }

    /// `list_all_tools()`: flat command/skill rows, "new schema" — no
    /// opaque metadata column (§4.1, §4.6).
    pub async fn list_all_tools(&self) -> Vec<ToolIndexRow> {
        self.list_all("tools").await
    }

    /// `list_all_tools_arrow()`: the same rows as a single Arrow table.
    pub async fn list_all_tools_arrow(&self) -> Result<RecordBatch> {
        let rows = self.list_all_tools().await;
        encode_tool_rows_arrow(&rows)
    }

    /// `delete_by_metadata_source`: remove every row (vector + keyword +
    /// cache) whose `skill_name` matches `source`, e.g. on skill unload.
    pub async fn delete_by_metadata_source(&self, table: &str, source: &str) -> Result<DeleteStats> {
        let ids: Vec<String> = {
            let rows = self.tool_index_rows.read().await;
            rows.get(table)
                .map(|rs| rs.iter().filter(|r| r.skill_name == source).map(|r| r.id.clone()).collect())
                .unwrap_or_default()
        };
        let stats = self
            .vector_store
            .delete(ids.clone())
            .await
            .map_err(|e| RuntimeError::StorageError(e.to_string()))?;
        {
            let mut keyword_index = self.keyword_index.write().await;
            for id in &ids {
                keyword_index.remove_document(table, id);
            }
        }
        let mut rows = self.tool_index_rows.write().await;
        if let Some(table_rows) = rows.get_mut(table) {
            table_rows.retain(|r| r.skill_name != source);
        }
        Ok(stats)
    }

    /// `analyze_table_health`: column/type-distribution analytics (§4.1,
    /// §10.4), grounded in PyArrow-style distribution analysis reimplemented
    /// over the flat row cache rather than a physical Arrow `RecordBatch`.
    pub async fn analyze_table_health(&self, table: &str) -> TableHealthReport {
        let rows = self.list_all(table).await;
        let mut null_counts = HashMap::new();
        null_counts.insert("tool_name".to_string(), rows.iter().filter(|r| r.tool_name.is_none()).count());
        null_counts.insert("category".to_string(), rows.iter().filter(|r| r.category.is_none()).count());
        null_counts.insert("file_path".to_string(), rows.iter().filter(|r| r.file_path.is_none()).count());

        let distinct_skills: std::collections::HashSet<&str> = rows.iter().map(|r| r.skill_name.as_str()).collect();
        let distinct_categories: std::collections::HashSet<&str> =
            rows.iter().filter_map(|r| r.category.as_deref()).collect();

        let mut row_type_counts = HashMap::new();
        for row in &rows {
            let key = match row.row_type {
                RowType::Skill => "skill",
                RowType::Command => "command",
            };
            *row_type_counts.entry(key.to_string()).or_insert(0) += 1;
        }

        TableHealthReport {
            table: table.to_string(),
            row_count: rows.len(),
            null_counts,
            distinct_skill_count: distinct_skills.len(),
            distinct_category_count: distinct_categories.len(),
            row_type_counts,
        }
    }

    /// Persist the relationship graph, rebuilt over the current tool rows (§4.6).
    pub async fn rebuild_relationship_graph(&self) -> RelationshipGraphFile {
        let rows = self.list_all_tools().await;
        let graph = RelationshipGraph::build(&rows);
        let file = graph.to_file();
        *self.relationship_graph.write().await = graph;
        file
    }

    pub async fn relationship_neighbors(&self, id: &str) -> Vec<(String, f32)> {
        self.relationship_graph.read().await.neighbors(id)
    }

    pub async fn load_relationship_graph(&self, file: &RelationshipGraphFile) {
        *self.relationship_graph.write().await = RelationshipGraph::from_file(file);
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.vector_store.health_check().await.map_err(|e| RuntimeError::StorageError(e.to_string()))
    }

    /// The checkpoint table's write path, schema-validated on every insert (§4.1, §4.9).
    pub async fn write_checkpoint(&self, record: CheckpointRecord) -> Result<()> {
        self.checkpoints.aput(record).await
    }

    pub async fn latest_checkpoint(&self, thread_id: &str) -> Result<Option<CheckpointRecord>> {
        self.checkpoints.aget_tuple(thread_id).await
    }

    pub async fn list_checkpoints(&self, thread_id: &str, limit: Option<usize>) -> Result<Vec<CheckpointRecord>> {
        self.checkpoints.alist(thread_id, limit).await
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

fn encode_search_results_ipc(results: &[SearchResult]) -> Result<Vec<u8>> {
    let schema = Schema::new(vec![Field::new("id", DataType::Utf8, false), Field::new("score", DataType::Float32, false)]);
    let ids: ArrayRef = Arc::new(StringArray::from(results.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()));
    let scores: ArrayRef = Arc::new(Float32Array::from(results.iter().map(|r| r.score).collect::<Vec<_>>()));
    let batch = RecordBatch::try_new(Arc::new(schema), vec![ids, scores])
        .map_err(|e| RuntimeError::StorageError(format!("failed to build Arrow batch: {e}")))?;
    encode_record_batch_ipc(&batch)
}

fn encode_tool_rows_arrow(rows: &[ToolIndexRow]) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("skill_name", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, true),
        Field::new("tool_name", DataType::Utf8, true),
        Field::new("file_path", DataType::Utf8, true),
    ]);
    let id: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()));
    let skill_name: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.skill_name.as_str()).collect::<Vec<_>>()));
    let category: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.category.as_deref()).collect::<Vec<_>>()));
    let tool_name: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.tool_name.as_deref()).collect::<Vec<_>>()));
    let file_path: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.file_path.as_deref()).collect::<Vec<_>>()));
    RecordBatch::try_new(Arc::new(schema), vec![id, skill_name, category, tool_name, file_path])
        .map_err(|e| RuntimeError::StorageError(format!("failed to build Arrow batch: {e}")))
}

fn encode_record_batch_ipc(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = arrow_ipc::writer::StreamWriter::try_new(&mut buffer, &batch.schema())
            .map_err(|e| RuntimeError::StorageError(format!("failed to open Arrow IPC writer: {e}")))?;
        writer.write(batch).map_err(|e| RuntimeError::StorageError(format!("failed to write Arrow IPC batch: {e}")))?;
        writer.finish().map_err(|e| RuntimeError::StorageError(format!("failed to finish Arrow IPC stream: {e}")))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::InMemoryVectorStore;

    fn bridge() -> NativeBridge {
        NativeBridge::new(Arc::new(InMemoryVectorStore::new()), Arc::new(SchemaRegistry::new().unwrap()), 4)
    }

    fn row(skill: &str, tool: &str, keywords: &[&str]) -> ToolIndexRow {
        ToolIndexRow::command_row(skill, tool, None, format!("{skill} {tool}"), None, keywords.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_create_index_rejects_dim_mismatch() {
        let bridge = bridge();
        assert!(bridge.create_index("tools", 4).is_ok());
        assert!(bridge.create_index("tools", 8).is_err());
    }

    #[tokio::test]
    async fn test_add_and_list_tools() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings("tools", vec![(row("git", "status", &["status"]), vec![0.1, 0.2, 0.3, 0.4])])
            .await
            .unwrap();
        let rows = bridge.list_all_tools().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "git.status");
    }

    #[tokio::test]
    async fn test_search_tools_returns_both_sources() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings(
                "tools",
                vec![(row("git", "status", &["status", "vcs"]), vec![1.0, 0.0, 0.0, 0.0])],
            )
            .await
            .unwrap();
        let (vector_hits, keyword_hits) = bridge
            .search_tools("tools", vec![1.0, 0.0, 0.0, 0.0], Some("git status"), 10, 0.0)
            .await
            .unwrap();
        assert!(!vector_hits.is_empty());
        assert!(!keyword_hits.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_metadata_source() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings(
                "tools",
                vec![
                    (row("git", "status", &["status"]), vec![0.1, 0.2, 0.3, 0.4]),
                    (row("git", "commit", &["commit"]), vec![0.2, 0.3, 0.4, 0.5]),
                ],
            )
            .await
            .unwrap();
        let stats = bridge.delete_by_metadata_source("tools", "git").await.unwrap();
        assert_eq!(stats.deleted, 2);
        assert!(bridge.list_all_tools().await.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_table_health() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings("tools", vec![(row("git", "status", &["status"]), vec![0.1, 0.2, 0.3, 0.4])])
            .await
            .unwrap();
        let report = bridge.analyze_table_health("tools").await;
        assert_eq!(report.row_count, 1);
        assert_eq!(report.distinct_skill_count, 1);
        assert_eq!(*report.row_type_counts.get("command").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_relationship_graph_round_trip() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings(
                "tools",
                vec![
                    (row("researcher", "run", &["research", "analyze"]), vec![0.1, 0.2, 0.3, 0.4]),
                    (row("crawl4ai", "crawl", &["crawl", "research"]), vec![0.2, 0.3, 0.4, 0.5]),
                ],
            )
            .await
            .unwrap();
        let file = bridge.rebuild_relationship_graph().await;
        assert!(!file.edges.is_empty());
        let neighbors = bridge.relationship_neighbors("researcher.run").await;
        assert_eq!(neighbors[0].0, "crawl4ai.crawl");
    }

    #[tokio::test]
    async fn test_list_all_tools_arrow_round_trips_ids() {
        let bridge = bridge();
        bridge
            .add_documents_with_embeddings("tools", vec![(row("git", "status", &["status"]), vec![0.1, 0.2, 0.3, 0.4])])
            .await
            .unwrap();
        let batch = bridge.list_all_tools_arrow().await.unwrap();
        assert_eq!(batch.num_rows(), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_write_and_read() {
        let bridge = bridge();
        bridge
            .write_checkpoint(CheckpointRecord {
                checkpoint_id: "cp-1".to_string(),
                thread_id: "T".to_string(),
                timestamp: 1.0,
                content: "{}".to_string(),
                parent_id: None,
                embedding: None,
                metadata: None,
            })
            .await
            .unwrap();
        let latest = bridge.latest_checkpoint("T").await.unwrap().unwrap();
        assert_eq!(latest.checkpoint_id, "cp-1");
    }

    #[test]
    fn test_simple_keyword_index_scores_overlap() {
        let mut index = SimpleKeywordIndex::default();
        index.index_document("tools", "a", "analyze a github repository");
        index.index_document("tools", "b", "crawl a url for research");
        let hits = index.search("tools", "analyze github repo", 10);
        assert_eq!(hits[0].0, "a");
    }

    #[cfg(feature = "hybrid-search")]
    #[test]
    fn test_tantivy_keyword_index_scores_overlap() {
        let mut index = TantivyKeywordIndex::default();
        index.index_document("tools", "a", "analyze a github repository");
        index.index_document("tools", "b", "crawl a url for research");
        assert_eq!(index.document_count("tools"), 2);

        let hits = index.search("tools", "analyze github repo", 10);
        assert_eq!(hits[0].0, "a");
    }

    #[cfg(feature = "hybrid-search")]
    #[test]
    fn test_tantivy_keyword_index_reindex_and_remove() {
        let mut index = TantivyKeywordIndex::default();
        index.index_document("tools", "a", "first version of the document");
        index.index_document("tools", "a", "second version of the document");
        assert_eq!(index.document_count("tools"), 1);

        index.remove_document("tools", "a");
        assert_eq!(index.document_count("tools"), 0);
        assert!(index.search("tools", "version", 10).is_empty());
    }
}
