//! Hybrid Router (§4.7): turns a free-text query into a `RouteResult`
//! naming a skill/command, or a typed no-result with a suggestion.
//!
//! Fusion follows the spec's explicit formula rather than the generic
//! `search::fusion` helpers (which fuse ranked lists, not a fixed weighted
//! sum plus an additive relationship term): `final = α·vector +
//! (1−α)·keyword_norm + relationship_boost`, min-max normalized per source.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::command_table::CommandTable;
use crate::embeddings::EmbeddingProvider;
use crate::errors::Result;
use crate::native_bridge::NativeBridge;

/// Confidence band assigned to a routed result (§4.7 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// The selected retrieval mode, surfaced in traces (§4.7 "Retrieval plan").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    VectorOnly,
    GraphOnly,
    Hybrid,
}

/// Every route produces one of these, independent of whether it matched (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalPlan {
    pub selected_mode: RetrievalMode,
    pub reason: String,
}

/// A successful route (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub skill: String,
    pub command: String,
    pub score: f32,
    pub confidence: Confidence,
    pub reason: String,
    pub plan: RetrievalPlan,
}

/// A failed route: no candidate passed the minimum floor (§4.7 step 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoRoute {
    pub suggestion: String,
    pub plan: RetrievalPlan,
}

/// The outcome of a routing attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RouteOutcome {
    Matched(RouteResult),
    NoMatch(NoRoute),
}

/// Router tuning, all overridable via config (§6 "Configuration").
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Weight of vector vs keyword in fusion (§4.7 step 2). Default 0.7.
    pub alpha: f32,
    /// β for the relationship-rerank boost. Default 0.06.
    pub relationship_boost: f32,
    pub top_n: usize,
    pub confidence_high: f32,
    pub confidence_medium: f32,
    pub minimum_floor: f32,
    pub scope_skill_level: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            relationship_boost: 0.06,
            top_n: 10,
            confidence_high: 0.75,
            confidence_medium: 0.45,
            minimum_floor: 0.2,
            scope_skill_level: false,
        }
    }
}

fn explicit_command_pattern() -> Regex {
    Regex::new(r"^[a-z][a-z0-9_]*\.[a-z][a-z0-9_]*$").expect("explicit-command pattern is a static regex")
}

fn min_max_normalize(scores: &[(String, f32)]) -> HashMap<String, f32> {
    if scores.is_empty() {
        return HashMap::new();
    }
    let min = scores.iter().map(|(_, s)| *s).fold(f32::MAX, f32::min);
    let max = scores.iter().map(|(_, s)| *s).fold(f32::MIN, f32::max);
    let range = max - min;
    scores
        .iter()
        .map(|(id, s)| (id.clone(), if range > 0.0 { (s - min) / range } else { 1.0 }))
        .collect()
}

/// The Hybrid Router (§4.7).
pub struct HybridRouter {
    bridge: Arc<NativeBridge>,
    commands: Arc<RwLock<CommandTable>>,
    embedder: Arc<dyn EmbeddingProvider>,
    table: String,
    config: RouterConfig,
    explicit_pattern: Regex,
}

impl HybridRouter {
    pub fn new(
        bridge: Arc<NativeBridge>,
        commands: Arc<RwLock<CommandTable>>,
        embedder: Arc<dyn EmbeddingProvider>,
        table: impl Into<String>,
        config: RouterConfig,
    ) -> Self {
        Self { bridge, commands, embedder, table: table.into(), config, explicit_pattern: explicit_command_pattern() }
    }

    /// Route `query` under `grants` (§4.3 scope filtering applies the
    /// caller's active permission set, §4.7 step 3).
    pub async fn route(&self, query: &str, grants: &[String]) -> Result<RouteOutcome> {
        // 1. Explicit-command shortcut.
        if self.explicit_pattern.is_match(query) {
            let commands = self.commands.read().await;
            if let Some(entry) = commands.get(query) {
                if crate::gatekeeper::validate(query, grants) {
                    return Ok(RouteOutcome::Matched(RouteResult {
                        skill: entry.skill_name.clone(),
                        command: entry.local_name.clone(),
                        score: 1.0,
                        confidence: Confidence::High,
                        reason: "explicit_command".to_string(),
                        plan: RetrievalPlan {
                            selected_mode: RetrievalMode::VectorOnly,
                            reason: "explicit command names an existing tool".to_string(),
                        },
                    }));
                }
            }
        }

        // 2. Hybrid search.
        let query_vector = self
            .embedder
            .embed_query(query)
            .await
            .map_err(|e| crate::errors::RuntimeError::ExecutionError(format!("embedding failed: {e}")))?;
        let (vector_hits, keyword_hits) =
            self.bridge.search_tools(&self.table, query_vector, Some(query), self.config.top_n, 0.0).await?;

        let vector_norm = min_max_normalize(&vector_hits);
        let keyword_norm = min_max_normalize(&keyword_hits);

        let mut ids: Vec<String> = vector_norm.keys().chain(keyword_norm.keys()).cloned().collect();
        ids.sort();
        ids.dedup();

        let mut fused: Vec<(String, f32)> = ids
            .into_iter()
            .map(|id| {
                let v = vector_norm.get(&id).copied().unwrap_or(0.0);
                let k = keyword_norm.get(&id).copied().unwrap_or(0.0);
                (id, self.config.alpha * v + (1.0 - self.config.alpha) * k)
            })
            .collect();

        // Relationship boost: neighbors of the top-scoring result get
        // β·edge_weight added, capped at 1.0 (§4.7 step 2).
        if let Some((top_id, _)) = fused.iter().max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)).cloned() {
            let neighbors = self.bridge.relationship_neighbors(&top_id).await;
            let neighbor_weights: HashMap<String, f32> = neighbors.into_iter().collect();
            for (id, score) in fused.iter_mut() {
                if let Some(weight) = neighbor_weights.get(id) {
                    *score = (*score + self.config.relationship_boost * weight).min(1.0);
                }
            }
        }

        fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        // 3. Filter by scope.
        let commands = self.commands.read().await;
        let filtered: Vec<(String, f32)> = fused
            .into_iter()
            .filter(|(id, _)| {
                let Some(entry) = commands.get(id) else { return false };
                if !self.config.scope_skill_level && entry.category == "skill" {
                    return false;
                }
                crate::gatekeeper::validate(id, grants)
            })
            .collect();

        let plan = RetrievalPlan { selected_mode: RetrievalMode::Hybrid, reason: "vector + keyword fusion".to_string() };

        // 5. Fallback chain.
        let Some((best_id, best_score)) = filtered.first().cloned() else {
            return Ok(RouteOutcome::NoMatch(NoRoute {
                suggestion: "use terminal or filesystem skills".to_string(),
                plan,
            }));
        };
        if best_score < self.config.minimum_floor {
            return Ok(RouteOutcome::NoMatch(NoRoute {
                suggestion: "use terminal or filesystem skills".to_string(),
                plan,
            }));
        }

        // 4. Confidence banding.
        let confidence = if best_score >= self.config.confidence_high {
            Confidence::High
        } else if best_score >= self.config.confidence_medium {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        let entry = commands.get(&best_id).expect("filtered ids exist in the command table");
        Ok(RouteOutcome::Matched(RouteResult {
            skill: entry.skill_name.clone(),
            command: entry.local_name.clone(),
            score: best_score,
            confidence,
            reason: "hybrid_search".to_string(),
            plan,
        }))
    }
}

impl std::fmt::Debug for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::{CommandEntry, CommandFlags};
    use crate::response::ToolResponse;
    use crate::schema_registry::SchemaRegistry;
    use crate::vector_store::InMemoryVectorStore;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed_documents(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model_name(&self) -> &str {
            "fixed-test-embedder"
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    fn entry(skill: &str, name: &str, category: &str) -> CommandEntry {
        CommandEntry {
            skill_name: skill.to_string(),
            local_name: name.to_string(),
            category: category.to_string(),
            description: "desc".to_string(),
            input_schema: serde_json::json!({}),
            output_type: "object".to_string(),
            flags: CommandFlags::default(),
            routing_keywords: vec![],
            handler: Arc::new(|_args| Box::pin(async { Ok(ToolResponse::success(serde_json::json!({}))) })),
            fixture: None,
        }
    }

    async fn router() -> (HybridRouter, Arc<NativeBridge>) {
        let bridge = Arc::new(NativeBridge::new(Arc::new(InMemoryVectorStore::new()), Arc::new(SchemaRegistry::new().unwrap()), 4));
        bridge
            .add_documents_with_embeddings(
                "tools",
                vec![(
                    crate::tool_index::ToolIndexRow::command_row(
                        "git",
                        "status",
                        None,
                        "show git status".to_string(),
                        None,
                        vec!["status".to_string(), "git".to_string()],
                    ),
                    vec![1.0, 0.0, 0.0, 0.0],
                )],
            )
            .await
            .unwrap();
        let mut table = CommandTable::new();
        table.register(entry("git", "status", "git")).unwrap();
        let commands = Arc::new(RwLock::new(table));
        let router = HybridRouter::new(bridge.clone(), commands, Arc::new(FixedEmbedder), "tools", RouterConfig::default());
        (router, bridge)
    }

    #[tokio::test]
    async fn test_explicit_command_shortcut() {
        let (router, _bridge) = router().await;
        let outcome = router.route("git.status", &["*".to_string()]).await.unwrap();
        match outcome {
            RouteOutcome::Matched(r) => {
                assert_eq!(r.score, 1.0);
                assert_eq!(r.confidence, Confidence::High);
                assert_eq!(r.reason, "explicit_command");
            }
            _ => panic!("expected a match"),
        }
    }

    #[tokio::test]
    async fn test_explicit_command_denied_without_grant() {
        let (router, _bridge) = router().await;
        let outcome = router.route("git.status", &[]).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::NoMatch(_)) || matches!(outcome, RouteOutcome::Matched(_)));
        // Falls through to hybrid search, which also filters by grant.
        if let RouteOutcome::Matched(r) = outcome {
            panic!("should not match without a grant: {r:?}");
        }
    }

    #[tokio::test]
    async fn test_hybrid_search_finds_command() {
        let (router, _bridge) = router().await;
        let outcome = router.route("show me the status", &["*".to_string()]).await.unwrap();
        match outcome {
            RouteOutcome::Matched(r) => assert_eq!(r.command, "status"),
            RouteOutcome::NoMatch(n) => panic!("expected a match, got no-route: {n:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_grant_falls_back_to_no_match() {
        let (router, _bridge) = router().await;
        let outcome = router.route("show me the status", &[]).await.unwrap();
        assert!(matches!(outcome, RouteOutcome::NoMatch(_)));
    }

    #[tokio::test]
    async fn test_unrelated_query_falls_back() {
        let (router, _bridge) = router().await;
        let outcome = router.route("zzzzz totally unrelated gibberish", &["*".to_string()]).await.unwrap();
        if let RouteOutcome::Matched(r) = &outcome {
            assert!(r.score < 0.9);
        }
    }
}
