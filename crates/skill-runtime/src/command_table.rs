//! Command Table & Schema Generation (§3, §4.5): registers one
//! [`CommandEntry`] per `@skill_command`-marked handler, generates its
//! input JSON schema from a declared parameter list (the portable
//! substitute for signature reflection), and caches generated schemas
//! keyed by fully-qualified name with a configurable TTL.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::response::ToolResponse;

/// MCP-style flags every command carries (§3).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CommandFlags {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
    pub open_world: bool,
    /// Whether the kernel injects host-supplied parameters (project root,
    /// config paths) before dispatch (§4.8 step 4).
    pub autowire: bool,
}

/// JSON-schema primitive types a handler parameter maps to (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    fn json_schema_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

/// One handler parameter, the unit schema generation works from. Parameters
/// with a `default` are not required (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// Injected parameters (e.g. `project_root`, `paths`) are excluded from
    /// the public schema; the kernel supplies them (§4.5).
    pub injected: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty, description: None, default: None, injected: false }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn injected(mut self) -> Self {
        self.injected = true;
        self
    }
}

/// Parse `Args:` bullets of the form `- name: type - description` out of a
/// docstring, attaching descriptions to already-declared parameters (§4.5).
pub fn parse_docstring_args(doc: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let mut in_args = false;
    for line in doc.lines() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("args:") {
            in_args = true;
            continue;
        }
        if !in_args {
            continue;
        }
        if trimmed.is_empty() {
            break;
        }
        let Some(rest) = trimmed.strip_prefix('-') else { break };
        let rest = rest.trim();
        let Some((name, tail)) = rest.split_once(':') else { continue };
        let description = tail.split_once('-').map(|(_, d)| d.trim()).unwrap_or_else(|| tail.trim());
        out.insert(name.trim().to_string(), description.to_string());
    }
    out
}

/// Generate a JSON-schema `object` from a declared parameter list, excluding
/// injected parameters, attaching docstring descriptions where present.
pub fn generate_input_schema(params: &[ParamSpec], doc: Option<&str>) -> Value {
    let descriptions = doc.map(parse_docstring_args).unwrap_or_default();
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in params.iter().filter(|p| !p.injected) {
        let mut prop = serde_json::Map::new();
        prop.insert("type".to_string(), Value::String(param.ty.json_schema_type().to_string()));
        let description = param
            .description
            .clone()
            .or_else(|| descriptions.get(&param.name).cloned());
        if let Some(description) = description {
            prop.insert("description".to_string(), Value::String(description));
        }
        if let Some(default) = &param.default {
            prop.insert("default".to_string(), default.clone());
        } else {
            required.push(Value::String(param.name.clone()));
        }
        properties.insert(param.name.clone(), Value::Object(prop));
    }

    serde_json::json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": required,
    })
}

/// Validate `args` against `schema`'s required/type constraints, returning
/// `(ok, errors)` per §4.5's `validate_tool_call`.
pub fn validate_tool_call(schema: &Value, args: &Value) -> (bool, Vec<String>) {
    let mut errors = Vec::new();
    let Some(obj) = args.as_object() else {
        return (false, vec!["arguments must be a JSON object".to_string()]);
    };

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for name in required {
            let Some(name) = name.as_str() else { continue };
            if !obj.contains_key(name) {
                errors.push(format!("missing required parameter: {name}"));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, value) in obj {
            let Some(prop) = properties.get(key) else { continue };
            let Some(expected) = prop.get("type").and_then(|t| t.as_str()) else { continue };
            if !type_matches(expected, value) {
                errors.push(format!("parameter '{key}' expected type {expected}"));
            }
        }
    }

    (errors.is_empty(), errors)
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

/// Boxed async handler invoked by the Execution Kernel (§4.8 step 5).
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<ToolResponse>> + Send>>;
pub type CommandHandler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// One registered command (§3). Immutable once registered in a load epoch.
#[derive(Clone)]
pub struct CommandEntry {
    pub skill_name: String,
    pub local_name: String,
    pub category: String,
    pub description: String,
    pub input_schema: Value,
    pub output_type: String,
    pub flags: CommandFlags,
    pub routing_keywords: Vec<String>,
    pub handler: CommandHandler,
    /// `@fixture("extension", "func_name")` marker (§4.4 step 4, §9): when
    /// present, the loader may swap `handler` for an extension-supplied
    /// implementation registered under this `(extension, func_name)` key.
    pub fixture: Option<(String, String)>,
}

impl CommandEntry {
    /// Fully-qualified name `skill.command` (§3 invariant 1).
    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.skill_name, self.local_name)
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("fully_qualified_name", &self.fully_qualified_name())
            .field("category", &self.category)
            .field("flags", &self.flags)
            .finish()
    }
}

struct CachedSchema {
    schema: Value,
    expires_at: Instant,
}

/// Generated-schema cache keyed by fully-qualified command name with a
/// configurable TTL (§4.5 invariant 2). Invalidation is explicit on reload
/// or `clear`.
pub struct SchemaCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedSchema>>,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Return the cached schema if present and unexpired, else `None`.
    pub fn get(&self, fqn: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap();
        entries.get(fqn).filter(|e| e.expires_at > Instant::now()).map(|e| e.schema.clone())
    }

    /// Insert/replace the cached schema for `fqn`.
    pub fn put(&self, fqn: &str, schema: Value) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(fqn.to_string(), CachedSchema { schema, expires_at: Instant::now() + self.ttl });
    }

    /// Explicit invalidation on reload or clear (§4.5).
    pub fn invalidate(&self, fqn: &str) {
        self.entries.write().unwrap().remove(fqn);
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The Command Table: maps fully-qualified names to entries within one load
/// epoch (§4.4 "Version resolution", §9 "Hot reload with isolation").
/// Registration is idempotent per name within an epoch; re-registering the
/// same name replaces the previous entry (reload).
#[derive(Default)]
pub struct CommandTable {
    entries: HashMap<String, CommandEntry>,
    epoch: u64,
}

impl CommandTable {
    pub fn new() -> Self {
        Self { entries: HashMap::new(), epoch: 0 }
    }

    pub fn register(&mut self, entry: CommandEntry) -> Result<()> {
        let fqn = entry.fully_qualified_name();
        self.entries.insert(fqn, entry);
        Ok(())
    }

    /// Replace every command belonging to `skill_name` (hot reload, §4.4).
    /// Bumps the load epoch so in-flight invocations retain their old
    /// handler reference while new invocations resolve the new one.
    pub fn reload_skill(&mut self, skill_name: &str, new_entries: Vec<CommandEntry>) {
        self.entries.retain(|_, e| e.skill_name != skill_name);
        for entry in new_entries {
            let _ = self.register(entry);
        }
        self.epoch += 1;
    }

    pub fn get(&self, fqn: &str) -> Option<&CommandEntry> {
        self.entries.get(fqn)
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.entries.contains_key(fqn)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }

    pub fn for_skill<'a>(&'a self, skill_name: &'a str) -> impl Iterator<Item = &'a CommandEntry> {
        self.entries.values().filter(move |e| e.skill_name == skill_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> CommandHandler {
        Arc::new(|_args| Box::pin(async { Ok(ToolResponse::success(serde_json::json!({}))) }))
    }

    fn entry(skill: &str, name: &str) -> CommandEntry {
        CommandEntry {
            skill_name: skill.to_string(),
            local_name: name.to_string(),
            category: skill.to_string(),
            description: "desc".to_string(),
            input_schema: serde_json::json!({}),
            output_type: "object".to_string(),
            flags: CommandFlags::default(),
            routing_keywords: vec![],
            handler: handler(),
            fixture: None,
        }
    }

    #[test]
    fn test_fully_qualified_name_unique() {
        let mut table = CommandTable::new();
        table.register(entry("git", "status")).unwrap();
        assert!(table.contains("git.status"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_schema_generation_excludes_injected() {
        let params = vec![
            ParamSpec::new("resource", ParamType::String),
            ParamSpec::new("project_root", ParamType::String).injected(),
        ];
        let schema = generate_input_schema(&params, None);
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("resource"));
        assert!(!props.contains_key("project_root"));
    }

    #[test]
    fn test_default_makes_param_not_required() {
        let params = vec![
            ParamSpec::new("namespace", ParamType::String).with_default(serde_json::json!("default")),
            ParamSpec::new("resource", ParamType::String),
        ];
        let schema = generate_input_schema(&params, None);
        let required: Vec<&str> = schema["required"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(required, vec!["resource"]);
    }

    #[test]
    fn test_docstring_arg_parsing() {
        let doc = "Gets a resource.\n\nArgs:\n    - resource: string - the resource type\n    - namespace: string - the namespace\n";
        let args = parse_docstring_args(doc);
        assert_eq!(args.get("resource").unwrap(), "the resource type");
        assert_eq!(args.get("namespace").unwrap(), "the namespace");
    }

    #[test]
    fn test_validate_tool_call_missing_required() {
        let schema = generate_input_schema(&[ParamSpec::new("resource", ParamType::String)], None);
        let (ok, errors) = validate_tool_call(&schema, &serde_json::json!({}));
        assert!(!ok);
        assert!(errors[0].contains("resource"));
    }

    #[test]
    fn test_validate_tool_call_type_mismatch() {
        let schema = generate_input_schema(&[ParamSpec::new("count", ParamType::Integer)], None);
        let (ok, _) = validate_tool_call(&schema, &serde_json::json!({"count": "not-a-number"}));
        assert!(!ok);
    }

    #[test]
    fn test_schema_cache_ttl_expiry() {
        let cache = SchemaCache::new(Duration::from_millis(10));
        cache.put("git.status", serde_json::json!({"cached": true}));
        assert!(cache.get("git.status").is_some());
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("git.status").is_none());
    }

    #[test]
    fn test_schema_cache_explicit_invalidate() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.put("git.status", serde_json::json!({}));
        cache.invalidate("git.status");
        assert!(cache.get("git.status").is_none());
    }

    #[test]
    fn test_hot_reload_replaces_commands_bumps_epoch() {
        let mut table = CommandTable::new();
        table.register(entry("git", "status")).unwrap();
        let epoch_before = table.epoch();
        table.reload_skill("git", vec![entry("git", "status"), entry("git", "commit")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.epoch(), epoch_before + 1);
    }
}
