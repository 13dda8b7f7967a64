//! Checkpointed Workflow Engine, part 2 (§4.10): the runnable graph, the
//! fan-out (chunked) path, and resume-from-checkpoint. Built on
//! `jobs::worker`'s worker-pool pattern, generalized from a persistent job
//! queue into an in-process level-parallel executor bounded by a
//! `tokio::sync::Semaphore` rather than a polling loop.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::checkpoint::{CheckpointBackend, CheckpointRecord, CheckpointStore, InMemoryCheckpointBackend};
use crate::command_table::{validate_tool_call, CommandHandler};
use crate::errors::{Result, RuntimeError};
use crate::kernel::{CallerContext, ExecutionKernel};
use crate::response::ToolResponse;
use crate::workflow::{NodeType, WorkflowBlueprint, WorkflowNode, WorkflowState};

fn now_ts() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Cooperative cancellation flag (§5 "Cancellation"): checked at each node
/// boundary, the engine's own suspension point. Does not preempt a handler
/// mid-flight — that is the Execution Kernel's per-call timeout's job.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------
// Sequential path: the compiled graph and node dispatch.
// ---------------------------------------------------------------------

/// A boxed async function registered for `Function` nodes (§3, §4.10).
pub type NodeFunction = Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// Registry of pure functions usable as workflow nodes, the function-node
/// counterpart to the Command Table (§3 "Node ... wraps either a skill
/// command or a pure function over state").
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, NodeFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, f: NodeFunction) {
        self.functions.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<NodeFunction> {
        self.functions.get(name).cloned()
    }
}

/// A [`WorkflowBlueprint`] compiled into a directed graph over node IDs
/// (§3, §4.10). `petgraph` is used for structural storage, matching
/// `tool_index::RelationshipGraph`'s choice; edge routing itself still
/// consults the blueprint directly because conditions are evaluated
/// against runtime state, not at compile time.
pub struct WorkflowGraph {
    blueprint: WorkflowBlueprint,
    #[allow(dead_code)]
    graph: DiGraph<String, ()>,
}

impl WorkflowGraph {
    /// Validate and compile a blueprint. Rejects dangling entry points or
    /// edge endpoints (§3 "Blueprint is a value object").
    pub fn compile(blueprint: WorkflowBlueprint) -> Result<Self> {
        blueprint.validate()?;
        let mut graph = DiGraph::new();
        let mut index_by_id = HashMap::new();
        for node in &blueprint.nodes {
            index_by_id.insert(node.id.clone(), graph.add_node(node.id.clone()));
        }
        for edge in &blueprint.edges {
            graph.add_edge(index_by_id[&edge.source], index_by_id[&edge.target], ());
        }
        Ok(Self { blueprint, graph })
    }

    pub fn entry_point(&self) -> &str {
        &self.blueprint.entry_point
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.blueprint.node(id)
    }

    /// Edges out of `id` whose condition (if any) evaluates true against
    /// `state`; unconditional edges are always taken (§3, §4.10).
    pub fn next_nodes(&self, id: &str, state: &WorkflowState) -> Vec<String> {
        self.blueprint
            .edges_from(id)
            .filter(|edge| edge.condition.as_deref().map(|c| state.evaluate_condition(c)).unwrap_or(true))
            .map(|edge| edge.target.clone())
            .collect()
    }

    pub fn required_skills(&self) -> &[String] {
        &self.blueprint.required_skills
    }
}

/// Drives one [`WorkflowGraph`] to completion along its sequential path,
/// writing a checkpoint after every node return (§4.10 "Persistence").
pub struct WorkflowRunner<B: CheckpointBackend = InMemoryCheckpointBackend> {
    graph: WorkflowGraph,
    kernel: Arc<ExecutionKernel>,
    functions: Arc<FunctionRegistry>,
    checkpoints: Arc<CheckpointStore<B>>,
    cancellation: CancellationToken,
}

impl<B: CheckpointBackend> WorkflowRunner<B> {
    pub fn new(
        graph: WorkflowGraph,
        kernel: Arc<ExecutionKernel>,
        functions: Arc<FunctionRegistry>,
        checkpoints: Arc<CheckpointStore<B>>,
    ) -> Self {
        Self { graph, kernel, functions, checkpoints, cancellation: CancellationToken::new() }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn required_skills(&self) -> &[String] {
        self.graph.required_skills()
    }

    /// Run from the blueprint's entry point (§4.10 "Sequential path").
    pub async fn run(&self, thread_id: &str, initial_state: WorkflowState, ctx: CallerContext) -> Result<WorkflowState> {
        self.run_from(thread_id, self.graph.entry_point().to_string(), initial_state, None, ctx).await
    }

    /// Resume a thread from its latest checkpoint (§4.10 "On resume, the
    /// engine loads the latest checkpoint for the thread, rehydrates
    /// state, and continues from the next node per the blueprint").
    pub async fn resume(&self, thread_id: &str, ctx: CallerContext) -> Result<WorkflowState> {
        let latest = self
            .checkpoints
            .aget_tuple(thread_id)
            .await?
            .ok_or_else(|| RuntimeError::ExecutionError(format!("no checkpoint for thread '{thread_id}'")))?;

        let state_value: Value = serde_json::from_str(&latest.content)
            .map_err(|e| RuntimeError::ExecutionError(format!("corrupt checkpoint content: {e}")))?;
        let state = WorkflowState::from_value(state_value);

        let last_node_id = latest
            .metadata
            .as_deref()
            .and_then(|m| serde_json::from_str::<Value>(m).ok())
            .and_then(|v| v.get("node_id").and_then(|n| n.as_str()).map(|s| s.to_string()))
            .ok_or_else(|| RuntimeError::ExecutionError("checkpoint is missing node_id metadata".to_string()))?;

        match self.graph.next_nodes(&last_node_id, &state).into_iter().next() {
            Some(next_id) => self.run_from(thread_id, next_id, state, Some(latest.checkpoint_id), ctx).await,
            // The last checkpointed node had no further edges: the workflow had already completed.
            None => Ok(state),
        }
    }

    async fn run_from(
        &self,
        thread_id: &str,
        start_node: String,
        mut state: WorkflowState,
        mut parent_id: Option<String>,
        ctx: CallerContext,
    ) -> Result<WorkflowState> {
        let mut current = Some(start_node);
        let mut visited = HashSet::new();
        let mut step: u64 = 0;

        while let Some(node_id) = current.take() {
            if self.cancellation.is_cancelled() {
                return Err(RuntimeError::Cancelled(format!("workflow '{thread_id}' cancelled before node '{node_id}'")));
            }
            if !visited.insert(node_id.clone()) {
                // A node revisited on the same path means a cycle in the
                // blueprint; stop rather than loop forever.
                break;
            }

            let node = self
                .graph
                .node(&node_id)
                .ok_or_else(|| RuntimeError::ExecutionError(format!("unknown node '{node_id}'")))?;

            let output = self.execute_node(node, &state, &ctx).await?;
            state.merge_node_output(node.project_output(&output));

            let checkpoint_id = format!("{thread_id}-{step}-{node_id}");
            let record = CheckpointRecord {
                checkpoint_id: checkpoint_id.clone(),
                thread_id: thread_id.to_string(),
                timestamp: now_ts(),
                content: serde_json::to_string(&state.as_value())
                    .map_err(|e| RuntimeError::ExecutionError(e.to_string()))?,
                parent_id: parent_id.clone(),
                embedding: None,
                metadata: Some(serde_json::json!({ "node_id": node_id, "step": step }).to_string()),
            };
            self.checkpoints.aput(record).await?;
            parent_id = Some(checkpoint_id);
            step += 1;

            current = self.graph.next_nodes(&node_id, &state).into_iter().next();
        }

        Ok(state)
    }

    async fn execute_node(&self, node: &WorkflowNode, state: &WorkflowState, ctx: &CallerContext) -> Result<Value> {
        let args = node.build_args(state);
        match node.node_type {
            NodeType::Skill => {
                let outcome = self.kernel.execute(&node.target, args, ctx.clone()).await;
                if !outcome.response.is_ok() {
                    return Err(RuntimeError::ExecutionError(format!(
                        "node '{}' ({}) failed: {}",
                        node.id,
                        node.target,
                        outcome.response.error_message.unwrap_or_default()
                    )));
                }
                Ok(outcome.response.data.unwrap_or(Value::Null))
            }
            NodeType::Function => {
                let f = self
                    .functions
                    .get(&node.target)
                    .ok_or_else(|| RuntimeError::ToolNotFound(node.target.clone()))?;
                f(args).await
            }
        }
    }
}

/// Package a compiled blueprint as an ordinary command (§4.10 "Graph
/// skills"): input validated against `input_schema`, output against
/// `output_schema`, both generic JSON-schema `object` shapes checked with
/// the same `validate_tool_call` the kernel uses for every other command.
pub fn blueprint_as_command_handler<B>(
    runner: Arc<WorkflowRunner<B>>,
    input_schema: Value,
    output_schema: Value,
) -> CommandHandler
where
    B: CheckpointBackend + 'static,
{
    Arc::new(move |args: Value| {
        let runner = runner.clone();
        let input_schema = input_schema.clone();
        let output_schema = output_schema.clone();
        Box::pin(async move {
            let (ok, errors) = validate_tool_call(&input_schema, &args);
            if !ok {
                return Ok(ToolResponse::error("TOOL_PARAM_INVALID", errors.join("; ")));
            }

            let thread_id = args
                .get("thread_id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("graph-skill-{}", uuid::Uuid::new_v4()));

            let state = WorkflowState::from_value(args);
            let result_state = runner.run(&thread_id, state, CallerContext::default()).await?;
            let output = result_state.as_value();

            let (ok, errors) = validate_tool_call(&output_schema, &output);
            if !ok {
                return Ok(ToolResponse::error(
                    "TOOL_EXECUTION_ERROR",
                    format!("workflow output failed its declared schema: {}", errors.join("; ")),
                ));
            }
            Ok(ToolResponse::success(output))
        })
    })
}

// ---------------------------------------------------------------------
// Fan-out (chunked) path: normalization, levels, parallel execution.
// ---------------------------------------------------------------------

/// One item of a master node's chunk plan (§3, §4.10).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkItem {
    pub chunk_id: String,
    pub name: String,
    pub targets: Vec<String>,
    pub description: String,
    /// Chunk IDs that must complete before this one starts; empty for a
    /// `parallel_all` plan or an unordered chunk (§4.10 step 3).
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ChunkItem {
    pub fn new(chunk_id: impl Into<String>, name: impl Into<String>, targets: Vec<String>) -> Self {
        Self { chunk_id: chunk_id.into(), name: name.into(), targets, description: String::new(), dependencies: Vec::new() }
    }

    pub fn size(&self) -> usize {
        self.targets.len()
    }
}

/// Fan-out normalization bounds (§4.10 step 1, §6 "chunk.*"). Callers
/// should keep `min_to_merge <= max_per_chunk / 2`: a merge is only
/// applied when the combined size still fits `max_per_chunk`, so a
/// `min_to_merge` close to `max_per_chunk` can leave two small consecutive
/// chunks unmerged.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    pub max_per_chunk: usize,
    pub max_total: usize,
    pub min_to_merge: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_per_chunk: 50, max_total: 500, min_to_merge: 5 }
    }
}

/// Normalize a chunk plan (§4.10 step 1, §8 "Chunk plan bounds"):
/// 1. split any chunk whose size exceeds `max_per_chunk`;
/// 2. cap total size at `max_total`, truncating the item that crosses the
///    budget and dropping anything after it;
/// 3. merge consecutive tiny chunks (both sizes `<= min_to_merge`) while
///    the merged size stays `<= max_per_chunk`.
pub fn normalize_chunks(plan: Vec<ChunkItem>, cfg: &ChunkConfig) -> Vec<ChunkItem> {
    let mut split = Vec::new();
    for item in plan {
        if cfg.max_per_chunk > 0 && item.size() > cfg.max_per_chunk {
            for (i, slice) in item.targets.chunks(cfg.max_per_chunk).enumerate() {
                split.push(ChunkItem {
                    chunk_id: format!("{}__{}", item.chunk_id, i),
                    name: item.name.clone(),
                    targets: slice.to_vec(),
                    description: item.description.clone(),
                    dependencies: item.dependencies.clone(),
                });
            }
        } else {
            split.push(item);
        }
    }

    let mut capped = Vec::new();
    let mut total = 0usize;
    for mut item in split {
        if total >= cfg.max_total {
            break;
        }
        let remaining = cfg.max_total - total;
        if item.size() > remaining {
            item.targets.truncate(remaining);
        }
        total += item.size();
        if !item.targets.is_empty() {
            capped.push(item);
        }
    }

    let mut merged: Vec<ChunkItem> = Vec::new();
    for item in capped {
        if let Some(last) = merged.last_mut() {
            if last.size() <= cfg.min_to_merge
                && item.size() <= cfg.min_to_merge
                && last.size() + item.size() <= cfg.max_per_chunk
            {
                last.chunk_id = format!("{}+{}", last.chunk_id, item.chunk_id);
                last.targets.extend(item.targets);
                continue;
            }
        }
        merged.push(item);
    }
    merged
}

/// Key a fan-out child work item so each chunk gets an isolated identity
/// (§4.10 step 2).
pub fn build_child_id(session_id: &str, chunk_id: &str) -> String {
    format!("{session_id}:{chunk_id}")
}

/// Build a child's isolated state: the inherited base plus its own
/// single-shard queue of targets (§4.10 step 2).
pub fn build_child_state(base: &WorkflowState, chunk: &ChunkItem) -> WorkflowState {
    let mut state = base.clone();
    state.0.insert("chunk_id".to_string(), Value::String(chunk.chunk_id.clone()));
    state.0.insert("queue".to_string(), Value::Array(chunk.targets.iter().cloned().map(Value::String).collect()));
    state
}

/// Group a normalized plan into execution levels (§4.10 step 3): one level
/// when `parallel_all`, else topologically by `dependencies`.
pub fn group_into_levels(plan: &[ChunkItem], parallel_all: bool) -> Vec<Vec<ChunkItem>> {
    if parallel_all {
        return vec![plan.to_vec()];
    }
    let mut pending = plan.to_vec();
    let mut done = HashSet::new();
    let mut levels = Vec::new();
    while !pending.is_empty() {
        let (ready, not_ready): (Vec<ChunkItem>, Vec<ChunkItem>) =
            pending.into_iter().partition(|c| c.dependencies.iter().all(|d| done.contains(d)));
        if ready.is_empty() {
            // Unsatisfiable dependency (cycle or missing chunk_id): run
            // what's left as a final best-effort level rather than hang.
            levels.push(not_ready);
            break;
        }
        for c in &ready {
            done.insert(c.chunk_id.clone());
        }
        levels.push(ready);
        pending = not_ready;
    }
    levels
}

/// Outcome of one chunk's execution: an error on one shard never panics
/// the level (§4.10 "Cancellation & timeouts") unless the caller chose
/// `return_exceptions: false`.
#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    pub chunk_id: String,
    pub result: std::result::Result<Value, String>,
}

/// A fan-out chunk's handler: turned into its own future per chunk so the
/// executor can bound concurrency with a semaphore (§4.10 step 4, §5).
pub type ChunkHandler = Arc<dyn Fn(ChunkItem) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// Runs normalized chunk levels with a semaphore of size `max_concurrent`
/// (unbounded when `None`), generalizing `jobs::worker::WorkerPool`'s
/// concurrency-bounded pool into an in-process, per-level executor
/// (§4.10 step 4).
pub struct FanOutExecutor {
    pub max_concurrent: Option<usize>,
    /// When `false`, one shard's failure escalates and aborts the level's
    /// remaining results instead of being collected per-chunk (§4.10
    /// "Cancellation & timeouts").
    pub return_exceptions: bool,
}

impl Default for FanOutExecutor {
    fn default() -> Self {
        Self { max_concurrent: None, return_exceptions: true }
    }
}

impl FanOutExecutor {
    pub fn new(max_concurrent: Option<usize>, return_exceptions: bool) -> Self {
        Self { max_concurrent, return_exceptions }
    }

    /// Run one level. `max_concurrent=Some(1)` makes the level effectively
    /// sequential (§8 boundary behavior); output order always matches
    /// input order, even with true concurrency, since results are awaited
    /// in spawn order rather than completion order.
    pub async fn run_level(&self, level: Vec<ChunkItem>, handler: ChunkHandler) -> Result<Vec<ChunkOutcome>> {
        let semaphore = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n.max(1))));
        let mut tasks = Vec::with_capacity(level.len());
        for item in level {
            let handler = handler.clone();
            let semaphore = semaphore.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = match &semaphore {
                    Some(sem) => Some(sem.acquire_owned().await.expect("semaphore never closed")),
                    None => None,
                };
                let chunk_id = item.chunk_id.clone();
                let result = handler(item).await.map_err(|e| e.to_string());
                ChunkOutcome { chunk_id, result }
            }));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut first_error: Option<String> = None;
        for task in tasks {
            let outcome = task
                .await
                .map_err(|e| RuntimeError::ExecutionError(format!("chunk task panicked: {e}")))?;
            if first_error.is_none() {
                if let Err(message) = &outcome.result {
                    first_error = Some(message.clone());
                }
            }
            outcomes.push(outcome);
        }

        if !self.return_exceptions {
            if let Some(message) = first_error {
                return Err(RuntimeError::ExecutionError(format!("chunk failure escalated: {message}")));
            }
        }
        Ok(outcomes)
    }

    /// Run every level of a plan in order, collecting all outcomes.
    pub async fn run_plan(&self, levels: Vec<Vec<ChunkItem>>, handler: ChunkHandler) -> Result<Vec<ChunkOutcome>> {
        let mut all = Vec::new();
        for level in levels {
            let outcomes = self.run_level(level, handler.clone()).await?;
            all.extend(outcomes);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::{CommandEntry, CommandFlags, CommandTable};
    use crate::schema_registry::SchemaRegistry;
    use crate::workflow::{WorkflowEdge, WorkflowNode};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::RwLock;

    fn skill_command(skill: &str, name: &str, handler: crate::command_table::CommandHandler) -> CommandEntry {
        CommandEntry {
            skill_name: skill.to_string(),
            local_name: name.to_string(),
            category: skill.to_string(),
            description: "desc".to_string(),
            input_schema: serde_json::json!({}),
            output_type: "object".to_string(),
            flags: CommandFlags::default(),
            routing_keywords: vec![],
            handler,
            fixture: None,
        }
    }

    fn kernel_with(entries: Vec<CommandEntry>) -> Arc<ExecutionKernel> {
        let mut table = CommandTable::new();
        for entry in entries {
            table.register(entry).unwrap();
        }
        Arc::new(ExecutionKernel::new(
            Arc::new(RwLock::new(table)),
            Arc::new(SchemaRegistry::new().unwrap()),
            Duration::from_secs(5),
        ))
    }

    fn checkpoint_store() -> Arc<CheckpointStore> {
        Arc::new(CheckpointStore::new(InMemoryCheckpointBackend::new(), Arc::new(SchemaRegistry::new().unwrap()), None))
    }

    // -- normalize_chunks -------------------------------------------------

    fn targets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i}")).collect()
    }

    #[test]
    fn test_normalize_respects_max_per_chunk() {
        let plan = vec![ChunkItem::new("a", "A", targets(12))];
        let cfg = ChunkConfig { max_per_chunk: 5, max_total: 100, min_to_merge: 1 };
        let out = normalize_chunks(plan, &cfg);
        assert!(out.iter().all(|c| c.size() <= cfg.max_per_chunk));
    }

    #[test]
    fn test_normalize_respects_max_total() {
        let plan = vec![ChunkItem::new("a", "A", targets(12)), ChunkItem::new("b", "B", targets(1))];
        let cfg = ChunkConfig { max_per_chunk: 5, max_total: 10, min_to_merge: 2 };
        let out = normalize_chunks(plan, &cfg);
        let total: usize = out.iter().map(|c| c.size()).sum();
        assert!(total <= cfg.max_total);
    }

    #[test]
    fn test_normalize_merges_consecutive_tiny_chunks() {
        let plan = vec![ChunkItem::new("b", "B", targets(1)), ChunkItem::new("c", "C", targets(1)), ChunkItem::new("d", "D", targets(1))];
        let cfg = ChunkConfig { max_per_chunk: 50, max_total: 100, min_to_merge: 2 };
        let out = normalize_chunks(plan, &cfg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].size(), 3);
    }

    #[test]
    fn test_normalize_no_two_consecutive_tiny_chunks_survive() {
        let plan = vec![
            ChunkItem::new("a", "A", targets(1)),
            ChunkItem::new("b", "B", targets(1)),
            ChunkItem::new("c", "C", targets(1)),
            ChunkItem::new("d", "D", targets(6)),
            ChunkItem::new("e", "E", targets(1)),
        ];
        let cfg = ChunkConfig { max_per_chunk: 20, max_total: 100, min_to_merge: 2 };
        let out = normalize_chunks(plan, &cfg);
        for pair in out.windows(2) {
            assert!(!(pair[0].size() <= cfg.min_to_merge && pair[1].size() <= cfg.min_to_merge));
        }
    }

    #[test]
    fn test_normalize_split_then_cap_then_merge_scenario() {
        // Mirrors the spec's worked example (A size 12, B/C/D size 1 each,
        // max_per_chunk=5, max_total=10, min_to_merge=2): A is split and
        // capped to exactly the 10-item budget; nothing remains for B/C/D
        // under a *global* total cap, which is the reading this crate
        // implements (see DESIGN.md).
        let plan = vec![
            ChunkItem::new("A", "A", targets(12)),
            ChunkItem::new("B", "B", targets(1)),
            ChunkItem::new("C", "C", targets(1)),
            ChunkItem::new("D", "D", targets(1)),
        ];
        let cfg = ChunkConfig { max_per_chunk: 5, max_total: 10, min_to_merge: 2 };
        let out = normalize_chunks(plan, &cfg);
        let total: usize = out.iter().map(|c| c.size()).sum();
        assert_eq!(total, 10);
        assert!(out.iter().all(|c| c.size() <= 5));
        assert!(out.iter().all(|c| c.chunk_id.starts_with("A__")));
    }

    #[test]
    fn test_build_child_id_is_stable_and_scoped() {
        let a = build_child_id("session-1", "chunk-a");
        let b = build_child_id("session-2", "chunk-a");
        assert_ne!(a, b);
        assert_eq!(a, build_child_id("session-1", "chunk-a"));
    }

    // -- group_into_levels -------------------------------------------------

    #[test]
    fn test_parallel_all_single_level() {
        let plan = vec![ChunkItem::new("a", "A", targets(1)), ChunkItem::new("b", "B", targets(1))];
        let levels = group_into_levels(&plan, true);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].len(), 2);
    }

    #[test]
    fn test_topological_levels_respect_dependencies() {
        let mut b = ChunkItem::new("b", "B", targets(1));
        b.dependencies.push("a".to_string());
        let mut c = ChunkItem::new("c", "C", targets(1));
        c.dependencies.push("b".to_string());
        let a = ChunkItem::new("a", "A", targets(1));
        let levels = group_into_levels(&vec![c, b, a], false);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0][0].chunk_id, "a");
        assert_eq!(levels[1][0].chunk_id, "b");
        assert_eq!(levels[2][0].chunk_id, "c");
    }

    // -- FanOutExecutor -----------------------------------------------------

    #[tokio::test]
    async fn test_max_concurrent_one_matches_sequential_order() {
        let executor = FanOutExecutor::new(Some(1), true);
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let order_clone = order.clone();
        let handler: ChunkHandler = Arc::new(move |item: ChunkItem| {
            let order = order_clone.clone();
            Box::pin(async move {
                order.lock().unwrap().push(item.chunk_id.clone());
                Ok(serde_json::json!({ "chunk_id": item.chunk_id }))
            })
        });
        let level = vec![ChunkItem::new("a", "A", targets(1)), ChunkItem::new("b", "B", targets(1)), ChunkItem::new("c", "C", targets(1))];
        let outcomes = executor.run_level(level, handler).await.unwrap();
        let ids: Vec<&str> = outcomes.iter().map(|o| o.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_one_shard_failure_does_not_abort_siblings_by_default() {
        let executor = FanOutExecutor::new(None, true);
        let handler: ChunkHandler = Arc::new(|item: ChunkItem| {
            Box::pin(async move {
                if item.chunk_id == "b" {
                    return Err(RuntimeError::ExecutionError("boom".to_string()));
                }
                Ok(serde_json::json!({}))
            })
        });
        let level = vec![ChunkItem::new("a", "A", targets(1)), ChunkItem::new("b", "B", targets(1)), ChunkItem::new("c", "C", targets(1))];
        let outcomes = executor.run_level(level, handler).await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().any(|o| o.chunk_id == "b" && o.result.is_err()));
        assert!(outcomes.iter().any(|o| o.chunk_id == "a" && o.result.is_ok()));
    }

    #[tokio::test]
    async fn test_return_exceptions_false_escalates() {
        let executor = FanOutExecutor::new(None, false);
        let handler: ChunkHandler = Arc::new(|item: ChunkItem| {
            Box::pin(async move {
                if item.chunk_id == "b" {
                    return Err(RuntimeError::ExecutionError("boom".to_string()));
                }
                Ok(serde_json::json!({}))
            })
        });
        let level = vec![ChunkItem::new("a", "A", targets(1)), ChunkItem::new("b", "B", targets(1))];
        let result = executor.run_level(level, handler).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unbounded_runs_all_concurrently() {
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let executor = FanOutExecutor::new(None, true);
        let c1 = concurrent.clone();
        let m1 = max_seen.clone();
        let handler: ChunkHandler = Arc::new(move |_item: ChunkItem| {
            let c1 = c1.clone();
            let m1 = m1.clone();
            Box::pin(async move {
                let now = c1.fetch_add(1, Ordering::SeqCst) + 1;
                m1.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                c1.fetch_sub(1, Ordering::SeqCst);
                Ok(serde_json::json!({}))
            })
        });
        let level: Vec<ChunkItem> = (0..5).map(|i| ChunkItem::new(format!("c{i}"), "C", targets(1))).collect();
        executor.run_level(level, handler).await.unwrap();
        assert!(max_seen.load(Ordering::SeqCst) > 1);
    }

    // -- WorkflowGraph / WorkflowRunner -------------------------------------

    fn two_node_blueprint(condition: Option<&str>) -> WorkflowBlueprint {
        WorkflowBlueprint {
            name: "wf".to_string(),
            description: String::new(),
            nodes: vec![WorkflowNode::skill("first", "git.status"), WorkflowNode::skill("second", "git.commit")],
            edges: vec![WorkflowEdge { source: "first".to_string(), target: "second".to_string(), condition: condition.map(|s| s.to_string()) }],
            entry_point: "first".to_string(),
            required_skills: vec!["git".to_string()],
        }
    }

    fn ok_handler(data: Value) -> crate::command_table::CommandHandler {
        Arc::new(move |_args| {
            let data = data.clone();
            Box::pin(async move { Ok(ToolResponse::success(data)) })
        })
    }

    #[tokio::test]
    async fn test_sequential_path_visits_every_reachable_node() {
        let graph = WorkflowGraph::compile(two_node_blueprint(None)).unwrap();
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"visited": "first"}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"visited": "second"}))),
        ]);
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), checkpoint_store());
        let state = runner.run("thread-1", WorkflowState::new(), CallerContext::default()).await.unwrap();
        assert_eq!(state.get("visited"), Some(&serde_json::json!("second")));
    }

    #[tokio::test]
    async fn test_conditional_edge_skips_when_false() {
        let graph = WorkflowGraph::compile(two_node_blueprint(Some("needs_fix"))).unwrap();
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"needs_fix": false}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"visited": "second"}))),
        ]);
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), checkpoint_store());
        let state = runner.run("thread-2", WorkflowState::new(), CallerContext::default()).await.unwrap();
        assert!(state.get("visited").is_none());
    }

    #[tokio::test]
    async fn test_checkpoint_written_after_each_node() {
        let graph = WorkflowGraph::compile(two_node_blueprint(None)).unwrap();
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"a": 1}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"b": 2}))),
        ]);
        let store = checkpoint_store();
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), store.clone());
        runner.run("thread-3", WorkflowState::new(), CallerContext::default()).await.unwrap();
        let chain = store.alist("thread-3", None).await.unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].parent_id.as_deref(), Some(chain[0].checkpoint_id.as_str()));
    }

    #[tokio::test]
    async fn test_resume_continues_from_next_node() {
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"a": 1}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"b": 2}))),
        ]);
        let store = checkpoint_store();

        // Simulate a crash after the first node: write its checkpoint only.
        store
            .aput(CheckpointRecord {
                checkpoint_id: "thread-4-0-first".to_string(),
                thread_id: "thread-4".to_string(),
                timestamp: now_ts(),
                content: serde_json::to_string(&serde_json::json!({"a": 1})).unwrap(),
                parent_id: None,
                embedding: None,
                metadata: Some(serde_json::json!({"node_id": "first"}).to_string()),
            })
            .await
            .unwrap();

        let graph = WorkflowGraph::compile(two_node_blueprint(None)).unwrap();
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), store.clone());
        let state = runner.resume("thread-4", CallerContext::default()).await.unwrap();
        assert_eq!(state.get("a"), Some(&serde_json::json!(1)));
        assert_eq!(state.get("b"), Some(&serde_json::json!(2)));
        let chain = store.alist("thread-4", None).await.unwrap();
        assert_eq!(chain.len(), 2);
    }

    #[tokio::test]
    async fn test_function_node_invokes_registered_function() {
        let graph = WorkflowGraph::compile(WorkflowBlueprint {
            name: "fn-wf".to_string(),
            description: String::new(),
            nodes: vec![WorkflowNode::function("only", "double")],
            edges: vec![],
            entry_point: "only".to_string(),
            required_skills: vec![],
        })
        .unwrap();
        let mut functions = FunctionRegistry::new();
        functions.register(
            "double",
            Arc::new(|args: Value| {
                Box::pin(async move {
                    let n = args.get("n").and_then(|v| v.as_i64()).unwrap_or(0);
                    Ok(serde_json::json!({ "n": n * 2 }))
                })
            }),
        );
        let kernel = kernel_with(vec![]);
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(functions), checkpoint_store());
        let mut state = WorkflowState::new();
        state.0.insert("n".to_string(), serde_json::json!(21));
        let mut node = WorkflowNode::function("only", "double");
        node.state_input_map.insert("n".to_string(), "n".to_string());
        // Rebuild the graph with the input-mapped node.
        let graph = WorkflowGraph::compile(WorkflowBlueprint {
            name: "fn-wf".to_string(),
            description: String::new(),
            nodes: vec![node],
            edges: vec![],
            entry_point: "only".to_string(),
            required_skills: vec![],
        })
        .unwrap();
        let runner = WorkflowRunner::new(graph, runner.kernel.clone(), runner.functions.clone(), checkpoint_store());
        let result = runner.run("thread-5", state, CallerContext::default()).await.unwrap();
        assert_eq!(result.get("n"), Some(&serde_json::json!(42)));
    }

    #[tokio::test]
    async fn test_cancellation_token_stops_before_next_node() {
        let graph = WorkflowGraph::compile(two_node_blueprint(None)).unwrap();
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"a": 1}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"b": 2}))),
        ]);
        let token = CancellationToken::new();
        token.cancel();
        let runner = WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), checkpoint_store()).with_cancellation(token);
        let result = runner.run("thread-6", WorkflowState::new(), CallerContext::default()).await;
        assert!(matches!(result, Err(RuntimeError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_blueprint_as_command_handler_round_trips() {
        let graph = WorkflowGraph::compile(two_node_blueprint(None)).unwrap();
        let kernel = kernel_with(vec![
            skill_command("git", "status", ok_handler(serde_json::json!({"a": 1}))),
            skill_command("git", "commit", ok_handler(serde_json::json!({"b": 2}))),
        ]);
        let runner = Arc::new(WorkflowRunner::new(graph, kernel, Arc::new(FunctionRegistry::new()), checkpoint_store()));
        let handler = blueprint_as_command_handler(runner, serde_json::json!({}), serde_json::json!({}));
        let response = handler(serde_json::json!({"thread_id": "graph-skill-1"})).await.unwrap();
        assert!(response.is_ok());
        assert_eq!(response.data.unwrap()["b"], serde_json::json!(2));
    }
}
