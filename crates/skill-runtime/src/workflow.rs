//! Checkpointed Workflow Engine, part 1 (§3, §4.10): the blueprint value
//! object (nodes, edges, entry point) and the typed workflow state with its
//! reducer semantics. The runnable graph and fan-out executor live in
//! `workflow_exec.rs`; this module only holds the data that round-trips to
//! and from YAML/JSON (§8 "Round-trip laws": "Save then reload a blueprint:
//! equal value").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, RuntimeError};

/// A workflow node wraps either a skill command or a pure function over
/// state (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Skill,
    Function,
}

/// One node of a [`WorkflowBlueprint`] (§3). `target` names the
/// `skill.command` to invoke (for `Skill` nodes) or a registered function
/// name (for `Function` nodes). `fixed_args` are merged with args derived
/// from `state_input_map` before dispatch; `state_output_map` says which
/// state keys the node's return value populates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub target: String,
    #[serde(default)]
    pub fixed_args: Map<String, Value>,
    #[serde(default)]
    pub state_input_map: HashMap<String, String>,
    #[serde(default)]
    pub state_output_map: HashMap<String, String>,
}

impl WorkflowNode {
    pub fn skill(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeType::Skill,
            target: target.into(),
            fixed_args: Map::new(),
            state_input_map: HashMap::new(),
            state_output_map: HashMap::new(),
        }
    }

    pub fn function(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeType::Function,
            target: target.into(),
            fixed_args: Map::new(),
            state_input_map: HashMap::new(),
            state_output_map: HashMap::new(),
        }
    }

    /// Build this node's call args: `fixed_args` overlaid with values pulled
    /// from `state` per `state_input_map` (`state_key -> arg_name`).
    pub fn build_args(&self, state: &WorkflowState) -> Value {
        let mut args = self.fixed_args.clone();
        for (state_key, arg_name) in &self.state_input_map {
            if let Some(value) = state.get(state_key) {
                args.insert(arg_name.clone(), value.clone());
            }
        }
        Value::Object(args)
    }

    /// Project a node's return value into a state-shaped object per
    /// `state_output_map` (`output_key -> state_key`). An empty map passes
    /// the whole return value through unchanged (the common case: the
    /// handler already returns a state-shaped object).
    pub fn project_output(&self, output: &Value) -> Map<String, Value> {
        if self.state_output_map.is_empty() {
            return output.as_object().cloned().unwrap_or_default();
        }
        let mut projected = Map::new();
        if let Some(obj) = output.as_object() {
            for (output_key, state_key) in &self.state_output_map {
                if let Some(value) = obj.get(output_key) {
                    projected.insert(state_key.clone(), value.clone());
                }
            }
        }
        projected
    }
}

/// An edge between two nodes, optionally guarded by a condition expression
/// over workflow state (§3), e.g. `"analysis.needs_fix"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A workflow blueprint (§3): a value object, serializable to and from
/// YAML/JSON, describing a directed graph of nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
    pub entry_point: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl WorkflowBlueprint {
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leaving `id`, in declaration order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a WorkflowEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Structural validation: the entry point and every edge endpoint must
    /// name a declared node.
    pub fn validate(&self) -> Result<()> {
        if self.node(&self.entry_point).is_none() {
            return Err(RuntimeError::ValidationError(format!(
                "entry_point '{}' does not name a declared node",
                self.entry_point
            )));
        }
        for edge in &self.edges {
            if self.node(&edge.source).is_none() {
                return Err(RuntimeError::ValidationError(format!(
                    "edge source '{}' does not name a declared node",
                    edge.source
                )));
            }
            if self.node(&edge.target).is_none() {
                return Err(RuntimeError::ValidationError(format!(
                    "edge target '{}' does not name a declared node",
                    edge.target
                )));
            }
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RuntimeError::ConfigError(e.to_string()))
    }
}

/// The typed workflow state dictionary (§3): a value object applying the
/// reducer semantics on every node return. Which reducer applies is
/// determined by the existing value's shape at that key, not a declared
/// per-field config: scalars are replaced, arrays accumulate (append),
/// objects merge by key (§3 "Workflow State").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowState(pub Map<String, Value>);

impl WorkflowState {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_value(value: Value) -> Self {
        Self(value.as_object().cloned().unwrap_or_default())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Dotted-path lookup, e.g. `"analysis.needs_fix"` navigates into a
    /// nested object. Used by edge condition evaluation (§3, §4.10).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.0.get(path.split('.').next()?)?;
        for segment in path.split('.').skip(1) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Apply one node's return value to state under the reducer rules (§3).
    pub fn merge_node_output(&mut self, output: Map<String, Value>) {
        for (key, value) in output {
            match self.0.get_mut(&key) {
                Some(existing) if existing.is_array() && value.is_array() => {
                    let existing_arr = existing.as_array_mut().expect("checked is_array");
                    existing_arr.extend(value.as_array().cloned().unwrap_or_default());
                }
                Some(existing) if existing.is_object() && value.is_object() => {
                    let existing_obj = existing.as_object_mut().expect("checked is_object");
                    for (k, v) in value.as_object().cloned().unwrap_or_default() {
                        existing_obj.insert(k, v);
                    }
                }
                _ => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    /// Truthy evaluation of a condition expression: a dotted path into
    /// state that resolves to a JSON value considered "true" — booleans by
    /// value, numbers non-zero, strings/arrays/objects non-empty (§3 "edge
    /// ... guarded by a predicate over state").
    pub fn evaluate_condition(&self, expr: &str) -> bool {
        match self.get(expr) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) => false,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blueprint() -> WorkflowBlueprint {
        WorkflowBlueprint {
            name: "analyze-and-fix".to_string(),
            description: "analyze then conditionally fix".to_string(),
            nodes: vec![
                WorkflowNode::skill("analyze", "code.analyze"),
                WorkflowNode::skill("fix", "code.fix"),
                WorkflowNode::function("report", "summarize"),
            ],
            edges: vec![
                WorkflowEdge { source: "analyze".to_string(), target: "fix".to_string(), condition: Some("analysis.needs_fix".to_string()) },
                WorkflowEdge { source: "analyze".to_string(), target: "report".to_string(), condition: None },
                WorkflowEdge { source: "fix".to_string(), target: "report".to_string(), condition: None },
            ],
            entry_point: "analyze".to_string(),
            required_skills: vec!["code".to_string()],
        }
    }

    #[test]
    fn test_blueprint_round_trip_yaml() {
        let bp = blueprint();
        let yaml = bp.to_yaml().unwrap();
        let reloaded = WorkflowBlueprint::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded.name, bp.name);
        assert_eq!(reloaded.nodes.len(), bp.nodes.len());
        assert_eq!(reloaded.entry_point, bp.entry_point);
    }

    #[test]
    fn test_blueprint_round_trip_json() {
        let bp = blueprint();
        let json = bp.to_json().unwrap();
        let reloaded = WorkflowBlueprint::from_json(&json).unwrap();
        assert_eq!(reloaded.edges.len(), bp.edges.len());
    }

    #[test]
    fn test_validate_rejects_unknown_entry_point() {
        let mut bp = blueprint();
        bp.entry_point = "nonexistent".to_string();
        assert!(bp.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_edge() {
        let mut bp = blueprint();
        bp.edges.push(WorkflowEdge { source: "analyze".to_string(), target: "missing".to_string(), condition: None });
        assert!(bp.validate().is_err());
    }

    #[test]
    fn test_scalar_field_replaced() {
        let mut state = WorkflowState::from_value(serde_json::json!({"status": "pending"}));
        let mut out = Map::new();
        out.insert("status".to_string(), serde_json::json!("done"));
        state.merge_node_output(out);
        assert_eq!(state.get("status"), Some(&serde_json::json!("done")));
    }

    #[test]
    fn test_list_field_accumulates() {
        let mut state = WorkflowState::from_value(serde_json::json!({"events": ["a"]}));
        let mut out = Map::new();
        out.insert("events".to_string(), serde_json::json!(["b", "c"]));
        state.merge_node_output(out);
        assert_eq!(state.get("events"), Some(&serde_json::json!(["a", "b", "c"])));
    }

    #[test]
    fn test_nested_dict_merges_by_key() {
        let mut state = WorkflowState::from_value(serde_json::json!({"analysis": {"needs_fix": true, "score": 1}}));
        let mut out = Map::new();
        out.insert("analysis".to_string(), serde_json::json!({"score": 2}));
        state.merge_node_output(out);
        assert_eq!(state.get("analysis.needs_fix"), Some(&serde_json::json!(true)));
        assert_eq!(state.get("analysis.score"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_dotted_path_condition_lookup() {
        let state = WorkflowState::from_value(serde_json::json!({"analysis": {"needs_fix": true}}));
        assert!(state.evaluate_condition("analysis.needs_fix"));
        assert!(!state.evaluate_condition("analysis.missing"));
        assert!(!state.evaluate_condition("nonexistent.path"));
    }

    #[test]
    fn test_build_args_merges_fixed_and_state_input() {
        let mut node = WorkflowNode::skill("fix", "code.fix");
        node.fixed_args.insert("dry_run".to_string(), serde_json::json!(false));
        node.state_input_map.insert("analysis.score".to_string(), "score".to_string());
        let state = WorkflowState::from_value(serde_json::json!({"analysis": {"score": 7}}));
        let args = node.build_args(&state);
        assert_eq!(args["dry_run"], serde_json::json!(false));
        assert_eq!(args["score"], serde_json::json!(7));
    }

    #[test]
    fn test_project_output_empty_map_passes_through() {
        let node = WorkflowNode::function("report", "summarize");
        let output = serde_json::json!({"summary": "ok"});
        let projected = node.project_output(&output);
        assert_eq!(projected.get("summary"), Some(&serde_json::json!("ok")));
    }

    #[test]
    fn test_project_output_remaps_keys() {
        let mut node = WorkflowNode::skill("analyze", "code.analyze");
        node.state_output_map.insert("result".to_string(), "analysis".to_string());
        let output = serde_json::json!({"result": {"needs_fix": true}, "ignored": 1});
        let projected = node.project_output(&output);
        assert_eq!(projected.get("analysis"), Some(&serde_json::json!({"needs_fix": true})));
        assert!(!projected.contains_key("ignored"));
    }
}
