//! Canonical response envelope returned by every command, on every transport.
//!
//! `ToolResponse` is the only shape a caller ever parses (§3, §6). Handlers
//! may return anything shaped like it; the Execution Kernel normalizes
//! everything else (a bare dict, a thrown error) into one of the four
//! variants below before it crosses the tool boundary (§4.8 step 6, §7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::RuntimeError;

/// Status of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// The call completed and produced a result.
    Success,
    /// The call failed; `error_code`/`error_message` are populated.
    Error,
    /// The gatekeeper denied the call.
    Blocked,
    /// A chunked result: the first batch of a `start`/`batch` exchange (§4.8).
    Partial,
}

/// The canonical response envelope (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl ToolResponse {
    /// Build a `success` response carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            status: ToolStatus::Success,
            data: Some(data),
            error_message: None,
            error_code: None,
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Build an `error` response with a stable code and sanitized message.
    ///
    /// Stack traces are logged via `tracing`, never placed in `error_message`.
    pub fn error(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            data: None,
            error_message: Some(message.into()),
            error_code: Some(error_code.into()),
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Build a `blocked` response with a human-readable reason.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Blocked,
            data: None,
            error_message: Some(reason.into()),
            error_code: Some("BLOCKED".to_string()),
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Build a `partial` (chunked `start`) response.
    pub fn partial(data: Value) -> Self {
        Self {
            status: ToolStatus::Partial,
            data: Some(data),
            error_message: None,
            error_code: None,
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach a metadata key, builder-style.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// `true` if this response represents a success or a partial (in-progress) result.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ToolStatus::Success | ToolStatus::Partial)
    }
}

impl From<RuntimeError> for ToolResponse {
    fn from(err: RuntimeError) -> Self {
        if let RuntimeError::Blocked { skill, tool, missing_grant } = &err {
            return ToolResponse::blocked(format!(
                "{skill}.{tool} requires grant '{missing_grant}'"
            ));
        }
        ToolResponse::error(err.error_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_round_trip() {
        let resp = ToolResponse::success(serde_json::json!({"ok": true}));
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: ToolResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, ToolStatus::Success);
        assert!(parsed.error_code.is_none());
    }

    #[test]
    fn test_error_from_runtime_error() {
        let err = RuntimeError::ToolNotFound("git.status".into());
        let resp: ToolResponse = err.into();
        assert_eq!(resp.status, ToolStatus::Error);
        assert_eq!(resp.error_code.as_deref(), Some("TOOL_NOT_FOUND"));
    }

    #[test]
    fn test_blocked_from_runtime_error() {
        let err = RuntimeError::Blocked {
            skill: "calc".into(),
            tool: "filesystem.read_files".into(),
            missing_grant: "filesystem:read_files".into(),
        };
        let resp: ToolResponse = err.into();
        assert_eq!(resp.status, ToolStatus::Blocked);
    }

    #[test]
    fn test_is_ok() {
        assert!(ToolResponse::success(Value::Null).is_ok());
        assert!(ToolResponse::partial(Value::Null).is_ok());
        assert!(!ToolResponse::error("X", "y").is_ok());
        assert!(!ToolResponse::blocked("no").is_ok());
    }
}
