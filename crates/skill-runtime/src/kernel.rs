//! Execution Kernel (§4.8): the resolve → validate → authorize → inject →
//! dispatch → normalize → trace pipeline every tool call runs through,
//! regardless of transport (MCP, HTTP, CLI, or a workflow node).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::command_table::CommandTable;
use crate::errors::{Result, RuntimeError};
use crate::gatekeeper;
use crate::response::ToolResponse;
use crate::schema_registry::{SchemaName, SchemaRegistry};

/// Everything the kernel needs about the caller and the in-flight turn to
/// authorize the call and fill in the route-trace record (§4.8 step 7).
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub session_id: String,
    pub turn_id: String,
    /// Effective grants for the skill being invoked (§4.3).
    pub grants: Vec<String>,
    /// Injected params supplied to autowired handlers (§4.8 step 4): project
    /// root, resolved config paths, and any other host-supplied values.
    pub injected: HashMap<String, Value>,
    /// Routing metadata carried over from the Hybrid Router, if this call
    /// originated from a natural-language route rather than an explicit
    /// command invocation (§4.7, §4.8 step 7).
    pub selected_route: Option<String>,
    pub confidence: Option<String>,
    pub risk_level: Option<String>,
    pub tool_trust_class: Option<String>,
    pub fallback_applied: bool,
    pub tool_chain: Vec<String>,
}

/// A completed route-trace record, validated against the route-trace schema
/// before being handed to the caller for emission (logging, telemetry sink).
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteTrace {
    pub session_id: String,
    pub turn_id: String,
    pub selected_route: Option<String>,
    pub confidence: Option<String>,
    pub risk_level: Option<String>,
    pub tool_trust_class: Option<String>,
    pub fallback_applied: bool,
    pub tool_chain: Vec<String>,
    pub latency_ms: f64,
    pub failure_taxonomy: Option<String>,
}

impl RouteTrace {
    fn to_payload(&self) -> Value {
        serde_json::json!({
            "session_id": self.session_id,
            "turn_id": self.turn_id,
            "selected_route": self.selected_route,
            "confidence": self.confidence,
            "risk_level": self.risk_level,
            "tool_trust_class": self.tool_trust_class,
            "fallback_applied": self.fallback_applied,
            "tool_chain": self.tool_chain,
            "latency_ms": self.latency_ms,
            "failure_taxonomy": self.failure_taxonomy,
        })
    }
}

/// The outcome of one kernel call: the normalized response plus its
/// schema-validated trace (§4.8 step 6-7).
pub struct KernelOutcome {
    pub response: ToolResponse,
    pub trace: RouteTrace,
}

/// The Execution Kernel (§4.8).
pub struct ExecutionKernel {
    commands: Arc<RwLock<CommandTable>>,
    schemas: Arc<SchemaRegistry>,
    execution_timeout: Duration,
}

impl ExecutionKernel {
    pub fn new(commands: Arc<RwLock<CommandTable>>, schemas: Arc<SchemaRegistry>, execution_timeout: Duration) -> Self {
        Self { commands, schemas, execution_timeout }
    }

    /// Run the full pipeline for `(tool_name, args, ctx)` (§4.8).
    pub async fn execute(&self, tool_name: &str, args: Value, ctx: CallerContext) -> KernelOutcome {
        let started = Instant::now();
        let (response, failure_taxonomy) = self.run(tool_name, args, &ctx).await;
        let trace = RouteTrace {
            session_id: ctx.session_id,
            turn_id: ctx.turn_id,
            selected_route: ctx.selected_route.or_else(|| Some(tool_name.to_string())),
            confidence: ctx.confidence,
            risk_level: ctx.risk_level,
            tool_trust_class: ctx.tool_trust_class,
            fallback_applied: ctx.fallback_applied,
            tool_chain: ctx.tool_chain,
            latency_ms: started.elapsed().as_secs_f64() * 1000.0,
            failure_taxonomy,
        };
        if let Err(e) = self.schemas.validate(SchemaName::RouteTrace, &trace.to_payload()) {
            warn!(error = %e, "route trace failed schema validation, emitting anyway");
        }
        KernelOutcome { response, trace }
    }

    async fn run(&self, tool_name: &str, args: Value, ctx: &CallerContext) -> (ToolResponse, Option<String>) {
        // 1. Resolve.
        let entry = {
            let commands = self.commands.read().await;
            match commands.get(tool_name) {
                Some(entry) => entry.clone(),
                None => {
                    let err = RuntimeError::ToolNotFound(tool_name.to_string());
                    return (err.into(), Some("resolve".to_string()));
                }
            }
        };

        // 2. Validate.
        let (ok, errors) = crate::command_table::validate_tool_call(&entry.input_schema, &args);
        if !ok {
            let err = RuntimeError::InvalidParams { tool: tool_name.to_string(), reason: errors.join("; ") };
            return (err.into(), Some("validate".to_string()));
        }

        // 3. Authorize.
        if let Err(gk) = gatekeeper::validate_or_raise(&entry.skill_name, tool_name, &ctx.grants) {
            return (
                ToolResponse::blocked(format!("{}.{} requires grant '{}'", gk.skill, gk.tool, gk.missing_grant)),
                Some("authorize".to_string()),
            );
        }

        // 4. Inject.
        let args = if entry.flags.autowire { inject_params(args, &ctx.injected) } else { args };

        // 5. Dispatch, with a per-call timeout. Handlers are always async
        // (§4.5's `HandlerFuture`); "sync on a worker thread" handlers are
        // modeled by the handler itself calling `tokio::task::spawn_blocking`.
        let dispatch = (entry.handler)(args);
        let outcome = tokio::time::timeout(self.execution_timeout, dispatch).await;

        // 6. Normalize.
        match outcome {
            Ok(Ok(response)) => (response, None),
            Ok(Err(err)) => {
                let taxonomy = Some(err.error_code().to_string());
                (err.into(), taxonomy)
            }
            Err(_) => {
                let millis = self.execution_timeout.as_millis() as u64;
                (RuntimeError::TimeoutError(millis).into(), Some("timeout".to_string()))
            }
        }
    }
}

/// Merge host-supplied values into `args` for autowired handlers (§4.8 step 4).
/// Injected keys always win over caller-supplied ones — a handler that
/// declared a parameter `injected` never trusts caller input for it.
fn inject_params(mut args: Value, injected: &HashMap<String, Value>) -> Value {
    if let Value::Object(map) = &mut args {
        for (key, value) in injected {
            map.insert(key.clone(), value.clone());
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::{CommandEntry, CommandFlags, ParamSpec, ParamType, generate_input_schema};
    use std::sync::Arc;

    fn kernel_with(entry: CommandEntry) -> ExecutionKernel {
        let mut table = CommandTable::new();
        table.register(entry).unwrap();
        ExecutionKernel::new(
            Arc::new(RwLock::new(table)),
            Arc::new(SchemaRegistry::new().unwrap()),
            Duration::from_secs(5),
        )
    }

    fn ctx(grants: &[&str]) -> CallerContext {
        CallerContext {
            session_id: "s1".to_string(),
            turn_id: "t1".to_string(),
            grants: grants.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn ok_entry(skill: &str, name: &str, schema: Value) -> CommandEntry {
        CommandEntry {
            skill_name: skill.to_string(),
            local_name: name.to_string(),
            category: skill.to_string(),
            description: "desc".to_string(),
            input_schema: schema,
            output_type: "object".to_string(),
            flags: CommandFlags::default(),
            routing_keywords: vec![],
            handler: Arc::new(|args| Box::pin(async move { Ok(ToolResponse::success(args)) })),
            fixture: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_resolves_to_not_found() {
        let kernel = kernel_with(ok_entry("git", "status", serde_json::json!({})));
        let outcome = kernel.execute("git.missing", serde_json::json!({}), ctx(&["*"])).await;
        assert_eq!(outcome.response.error_code.as_deref(), Some("TOOL_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_invalid_params_rejected_before_dispatch() {
        let schema = generate_input_schema(&[ParamSpec::new("resource", ParamType::String)], None);
        let kernel = kernel_with(ok_entry("git", "status", schema));
        let outcome = kernel.execute("git.status", serde_json::json!({}), ctx(&["*"])).await;
        assert_eq!(outcome.response.error_code.as_deref(), Some("TOOL_PARAM_INVALID"));
    }

    #[tokio::test]
    async fn test_missing_grant_blocks() {
        let kernel = kernel_with(ok_entry("git", "status", serde_json::json!({})));
        let outcome = kernel.execute("git.status", serde_json::json!({}), ctx(&[])).await;
        assert_eq!(outcome.response.status, crate::response::ToolStatus::Blocked);
    }

    #[tokio::test]
    async fn test_successful_call_passes_through() {
        let kernel = kernel_with(ok_entry("git", "status", serde_json::json!({})));
        let outcome = kernel.execute("git.status", serde_json::json!({"x": 1}), ctx(&["*"])).await;
        assert_eq!(outcome.response.status, crate::response::ToolStatus::Success);
        assert_eq!(outcome.response.data, Some(serde_json::json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_injection_overrides_caller_supplied_value() {
        let mut entry = ok_entry("git", "status", serde_json::json!({}));
        entry.flags.autowire = true;
        let kernel = kernel_with(entry);
        let mut caller_ctx = ctx(&["*"]);
        caller_ctx.injected.insert("project_root".to_string(), serde_json::json!("/trusted"));
        let outcome = kernel
            .execute("git.status", serde_json::json!({"project_root": "/untrusted"}), caller_ctx)
            .await;
        assert_eq!(outcome.response.data.unwrap()["project_root"], serde_json::json!("/trusted"));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let mut entry = ok_entry("slow", "op", serde_json::json!({}));
        entry.handler = Arc::new(|_args| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(ToolResponse::success(serde_json::json!({})))
            })
        });
        let mut table = CommandTable::new();
        table.register(entry).unwrap();
        let kernel = ExecutionKernel::new(
            Arc::new(RwLock::new(table)),
            Arc::new(SchemaRegistry::new().unwrap()),
            Duration::from_millis(1),
        );
        let outcome = kernel.execute("slow.op", serde_json::json!({}), ctx(&["*"])).await;
        assert_eq!(outcome.response.error_code.as_deref(), Some("TIMEOUT"));
    }

    #[tokio::test]
    async fn test_trace_carries_latency_and_session() {
        let kernel = kernel_with(ok_entry("git", "status", serde_json::json!({})));
        let outcome = kernel.execute("git.status", serde_json::json!({}), ctx(&["*"])).await;
        assert_eq!(outcome.trace.session_id, "s1");
        assert!(outcome.trace.latency_ms >= 0.0);
    }
}
