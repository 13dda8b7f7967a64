use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Component loading failed: {0}")]
    ComponentLoadError(String),

    #[error("Component validation failed: {0}")]
    ValidationError(String),

    #[error("Sandbox initialization failed: {0}")]
    SandboxError(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Instance not found: {skill}/{instance}")]
    InstanceNotFound {
        skill: String,
        instance: String,
    },

    #[error("WASM runtime error: {0}")]
    WasmError(#[from] wasmtime::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Native bridge I/O or schema mismatch against the physical store (§7 "Storage errors").
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A cross-boundary payload failed JSON-schema validation (§7 "Contract errors").
    /// `pointer` is the JSON-pointer of the first offending field.
    #[error("Schema validation failed at {pointer}: {message}")]
    SchemaValidationError {
        pointer: String,
        message: String,
    },

    /// Per-call execution exceeded its timeout, or the caller cancelled it (§7 "Timeout / cancellation").
    #[error("Operation timed out after {0}ms")]
    TimeoutError(u64),

    /// The gatekeeper denied an invocation (§4.3, §7 "Authorization errors").
    #[error("Blocked: {skill}.{tool} missing grant {missing_grant}")]
    Blocked {
        skill: String,
        tool: String,
        missing_grant: String,
    },

    /// No such tool or skill (§7 "Resolution errors").
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Input schema validation failed before dispatch (§4.8 step 2).
    #[error("Invalid parameters for {tool}: {reason}")]
    InvalidParams {
        tool: String,
        reason: String,
    },

    /// A workflow was cancelled cooperatively before or during a node boundary (§4.10, §5).
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl RuntimeError {
    /// Stable error code surfaced on `ToolResponse.error_code` (§6, §7).
    pub fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::ToolNotFound(_) => "TOOL_NOT_FOUND",
            RuntimeError::InvalidParams { .. } => "TOOL_PARAM_INVALID",
            RuntimeError::Blocked { .. } => "BLOCKED",
            RuntimeError::StorageError(_) => "STORAGE_ERROR",
            RuntimeError::SchemaValidationError { .. } => "CONTRACT_ERROR",
            RuntimeError::TimeoutError(_) => "TIMEOUT",
            RuntimeError::ExecutionError(_) => "TOOL_EXECUTION_ERROR",
            RuntimeError::ConfigError(_) => "CONFIG_ERROR",
            RuntimeError::InstanceNotFound { .. } => "INSTANCE_NOT_FOUND",
            RuntimeError::ComponentLoadError(_) => "COMPONENT_LOAD_ERROR",
            RuntimeError::ValidationError(_) => "VALIDATION_ERROR",
            RuntimeError::SandboxError(_) => "SANDBOX_ERROR",
            RuntimeError::WasmError(_) => "WASM_ERROR",
            RuntimeError::IoError(_) => "IO_ERROR",
            RuntimeError::TomlError(_) => "TOML_ERROR",
            RuntimeError::Cancelled(_) => "CANCELLED",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
