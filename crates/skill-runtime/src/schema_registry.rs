//! Schema Registry (§4.2): loads and caches the JSON schemas that every
//! cross-boundary payload (checkpoint records, discover matches, memory-gate
//! events, route traces, link-graph search options, skills-monitor signals)
//! must conform to, and validates payloads against them.
//!
//! A missing or invalid schema file at process start is a hard failure —
//! callers are expected to propagate `SchemaRegistry::new()`'s `Err` and
//! abort startup rather than run with a partial registry.

use std::collections::HashMap;

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::errors::{Result, RuntimeError};

/// Name of a registered schema, also used as the lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    Checkpoint,
    DiscoverMatch,
    MemoryGateEvent,
    RouteTrace,
    LinkGraphOptions,
    MonitorSignal,
}

impl SchemaName {
    fn as_str(&self) -> &'static str {
        match self {
            SchemaName::Checkpoint => "checkpoint",
            SchemaName::DiscoverMatch => "discover_match",
            SchemaName::MemoryGateEvent => "memory_gate_event",
            SchemaName::RouteTrace => "route_trace",
            SchemaName::LinkGraphOptions => "link_graph_options",
            SchemaName::MonitorSignal => "monitor_signal",
        }
    }

    const ALL: [SchemaName; 6] = [
        SchemaName::Checkpoint,
        SchemaName::DiscoverMatch,
        SchemaName::MemoryGateEvent,
        SchemaName::RouteTrace,
        SchemaName::LinkGraphOptions,
        SchemaName::MonitorSignal,
    ];

    fn raw_document(&self) -> &'static str {
        match self {
            SchemaName::Checkpoint => include_str!("../../../schemas/checkpoint.json"),
            SchemaName::DiscoverMatch => include_str!("../../../schemas/discover_match.json"),
            SchemaName::MemoryGateEvent => include_str!("../../../schemas/memory_gate_event.json"),
            SchemaName::RouteTrace => include_str!("../../../schemas/route_trace.json"),
            SchemaName::LinkGraphOptions => include_str!("../../../schemas/link_graph_options.json"),
            SchemaName::MonitorSignal => include_str!("../../../schemas/monitor_signal.json"),
        }
    }
}

/// A compiled schema plus the raw `Value` it was compiled from, so
/// `build_*` helpers can reconstruct canonical payloads.
struct CompiledSchema {
    document: Value,
    compiled: JSONSchema,
}

/// Loads, caches, and validates against the six cross-boundary JSON schemas.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, CompiledSchema>,
}

impl SchemaRegistry {
    /// Compile every schema in [`SchemaName::ALL`]. Fails hard (per §4.2) if
    /// any document is missing or fails to compile.
    pub fn new() -> Result<Self> {
        let mut schemas = HashMap::new();
        for name in SchemaName::ALL {
            let document: Value = serde_json::from_str(name.raw_document()).map_err(|e| {
                RuntimeError::SchemaValidationError {
                    pointer: "".to_string(),
                    message: format!("failed to parse schema {}: {e}", name.as_str()),
                }
            })?;
            let compiled = JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&document)
                .map_err(|e| RuntimeError::SchemaValidationError {
                    pointer: "".to_string(),
                    message: format!("failed to compile schema {}: {e}", name.as_str()),
                })?;
            schemas.insert(name.as_str(), CompiledSchema { document, compiled });
        }
        Ok(Self { schemas })
    }

    /// Validate `payload` against `name`. On failure, returns the JSON
    /// pointer of the first offending field (§4.2, §7 "Contract errors").
    pub fn validate(&self, name: SchemaName, payload: &Value) -> Result<()> {
        let entry = self.schemas.get(name.as_str()).expect("all schemas are compiled in new()");
        let result = entry.compiled.validate(payload);
        if let Err(mut errors) = result {
            if let Some(first) = errors.next() {
                return Err(RuntimeError::SchemaValidationError {
                    pointer: first.instance_path.to_string(),
                    message: first.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Retrieve the raw schema document (e.g. to publish a `$id`-bearing
    /// schema alongside a command's generated input schema).
    pub fn document(&self, name: SchemaName) -> &Value {
        &self.schemas.get(name.as_str()).expect("all schemas are compiled in new()").document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_loads_all_schemas() {
        let registry = SchemaRegistry::new().unwrap();
        for name in SchemaName::ALL {
            assert!(registry.document(name).get("$id").is_some());
        }
    }

    #[test]
    fn test_valid_checkpoint_passes() {
        let registry = SchemaRegistry::new().unwrap();
        let payload = json!({
            "checkpoint_id": "cp-2",
            "thread_id": "T",
            "timestamp": 1700000000.0,
            "content": "{}",
            "parent_id": "cp-1",
        });
        assert!(registry.validate(SchemaName::Checkpoint, &payload).is_ok());
    }

    #[test]
    fn test_invalid_checkpoint_reports_pointer() {
        let registry = SchemaRegistry::new().unwrap();
        let payload = json!({ "thread_id": "T", "timestamp": 1.0, "content": "{}" });
        let err = registry.validate(SchemaName::Checkpoint, &payload).unwrap_err();
        match err {
            RuntimeError::SchemaValidationError { .. } => {}
            other => panic!("expected SchemaValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_route_trace_requires_latency() {
        let registry = SchemaRegistry::new().unwrap();
        let payload = json!({ "session_id": "s", "turn_id": "t" });
        assert!(registry.validate(SchemaName::RouteTrace, &payload).is_err());
    }
}
