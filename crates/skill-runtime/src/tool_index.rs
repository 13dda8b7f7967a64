//! Tool Index & Ingestion (§3, §4.6): a flat, no-opaque-metadata row per
//! skill and per command, plus a relationship graph built from keyword
//! overlap. Ingestion is idempotent by `id`.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// A row's kind: a skill-level entry or a command-level entry (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Skill,
    Command,
}

/// One row of the tool-index table (§3, §4.6). Columns are strictly typed;
/// there is no opaque metadata blob ("new schema").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolIndexRow {
    /// Fully-qualified command name for command rows; skill name for skill rows.
    pub id: String,
    /// Embeddable text combining name, description, keywords.
    pub content: String,
    pub skill_name: String,
    pub tool_name: Option<String>,
    pub category: Option<String>,
    pub file_path: Option<String>,
    pub keywords: Vec<String>,
    #[serde(rename = "type")]
    pub row_type: RowType,
}

impl ToolIndexRow {
    pub fn skill_row(skill_name: impl Into<String>, content: impl Into<String>, keywords: Vec<String>) -> Self {
        let skill_name = skill_name.into();
        Self {
            id: skill_name.clone(),
            content: content.into(),
            skill_name,
            tool_name: None,
            category: None,
            file_path: None,
            keywords,
            row_type: RowType::Skill,
        }
    }

    pub fn command_row(
        skill_name: impl Into<String>,
        tool_name: impl Into<String>,
        category: Option<String>,
        content: impl Into<String>,
        file_path: Option<String>,
        keywords: Vec<String>,
    ) -> Self {
        let skill_name = skill_name.into();
        let tool_name = tool_name.into();
        Self {
            id: format!("{skill_name}.{tool_name}"),
            content: content.into(),
            skill_name,
            tool_name: Some(tool_name),
            category,
            file_path,
            keywords,
            row_type: RowType::Command,
        }
    }

    fn keyword_set(&self) -> HashSet<&str> {
        self.keywords.iter().map(|s| s.as_str()).collect()
    }
}

/// Weight contribution for rows belonging to the same skill (§3).
const SAME_SKILL_BONUS: f32 = 0.1;
/// Weight contribution per shared cross-reference keyword beyond Jaccard (§3).
const SHARED_REFERENCE_BONUS: f32 = 0.05;

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Undirected weighted graph over command IDs (§3, §9 "Cycles and
/// back-references"). Backed by `petgraph`, persisted as a sibling JSON
/// document (adjacency list keyed by ID).
#[derive(Default)]
pub struct RelationshipGraph {
    graph: UnGraph<String, f32>,
    index_by_id: HashMap<String, NodeIndex>,
}

/// Serializable adjacency-list form persisted as `skill_relationships.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelationshipGraphFile {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String, f32)>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index_by_id.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.index_by_id.insert(id.to_string(), idx);
        idx
    }

    /// Rebuild the graph from scratch over the given command rows (§4.6
    /// "Rebuilt after ingestion"). Skill rows are excluded — the graph is
    /// over command IDs only (§3).
    pub fn build(rows: &[ToolIndexRow]) -> Self {
        let mut g = Self::new();
        let commands: Vec<&ToolIndexRow> = rows.iter().filter(|r| r.row_type == RowType::Command).collect();
        for row in &commands {
            g.node(&row.id);
        }
        for i in 0..commands.len() {
            for j in (i + 1)..commands.len() {
                let a = commands[i];
                let b = commands[j];
                let weight = g.edge_weight(a, b);
                if weight > 0.0 {
                    g.add_edge(&a.id, &b.id, weight);
                }
            }
        }
        g
    }

    fn edge_weight(&self, a: &ToolIndexRow, b: &ToolIndexRow) -> f32 {
        let mut weight = jaccard(&a.keyword_set(), &b.keyword_set());
        if a.skill_name == b.skill_name {
            weight += SAME_SKILL_BONUS;
        }
        let shared = a.keyword_set().intersection(&b.keyword_set()).count();
        if shared > 0 {
            weight += SHARED_REFERENCE_BONUS * shared as f32;
        }
        weight
    }

    fn add_edge(&mut self, a: &str, b: &str, weight: f32) {
        let ai = self.node(a);
        let bi = self.node(b);
        self.graph.update_edge(ai, bi, weight);
    }

    /// Neighbors of `id` with their edge weight, used for the router's
    /// relationship-boost term (§4.7).
    pub fn neighbors(&self, id: &str) -> Vec<(String, f32)> {
        let Some(&idx) = self.index_by_id.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx { edge.target() } else { edge.source() };
                (self.graph[other].clone(), *edge.weight())
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Every node ID currently in the graph, in no particular order.
    pub fn node_ids(&self) -> Vec<String> {
        self.graph.node_weights().cloned().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Serialize to the on-disk adjacency-list form.
    pub fn to_file(&self) -> RelationshipGraphFile {
        let nodes: Vec<String> = self.graph.node_weights().cloned().collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| (self.graph[e.source()].clone(), self.graph[e.target()].clone(), *e.weight()))
            .collect();
        RelationshipGraphFile { nodes, edges }
    }

    /// Rebuild from the on-disk adjacency-list form.
    pub fn from_file(file: &RelationshipGraphFile) -> Self {
        let mut g = Self::new();
        for node in &file.nodes {
            g.node(node);
        }
        for (a, b, weight) in &file.edges {
            g.add_edge(a, b, *weight);
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(skill: &str, tool: &str, keywords: &[&str]) -> ToolIndexRow {
        ToolIndexRow::command_row(
            skill,
            tool,
            None,
            format!("{skill}.{tool}"),
            None,
            keywords.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_shared_keyword_creates_edge() {
        let rows = vec![
            cmd("researcher", "run", &["research", "analyze", "github"]),
            cmd("crawl4ai", "crawl", &["crawl", "url", "research"]),
        ];
        let graph = RelationshipGraph::build(&rows);
        let neighbors = graph.neighbors("researcher.run");
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].0, "crawl4ai.crawl");
        assert!(neighbors[0].1 > 0.0);
    }

    #[test]
    fn test_same_skill_bonus_applied() {
        let rows = vec![
            cmd("git", "status", &["status"]),
            cmd("git", "commit", &["commit"]),
        ];
        let graph = RelationshipGraph::build(&rows);
        let neighbors = graph.neighbors("git.status");
        assert_eq!(neighbors.len(), 1);
        assert!((neighbors[0].1 - SAME_SKILL_BONUS).abs() < 1e-6);
    }

    #[test]
    fn test_no_overlap_no_edge() {
        let rows = vec![cmd("a", "x", &["foo"]), cmd("b", "y", &["bar"])];
        let graph = RelationshipGraph::build(&rows);
        assert!(graph.neighbors("a.x").is_empty());
    }

    #[test]
    fn test_skill_rows_excluded_from_graph() {
        let rows = vec![
            ToolIndexRow::skill_row("git", "git skill", vec!["vcs".into()]),
            cmd("git", "status", &["vcs"]),
        ];
        let graph = RelationshipGraph::build(&rows);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let rows = vec![
            cmd("researcher", "run", &["research", "analyze"]),
            cmd("crawl4ai", "crawl", &["crawl", "research"]),
        ];
        let graph = RelationshipGraph::build(&rows);
        let file = graph.to_file();
        let reloaded = RelationshipGraph::from_file(&file);
        assert_eq!(reloaded.to_file(), file);
    }

    #[test]
    fn test_ingest_exact_command_lookup() {
        let rows = vec![cmd("git", "status", &["status"])];
        let hit = rows.iter().find(|r| r.id == "git.status");
        assert!(hit.is_some());
    }
}
