//! Permission Gatekeeper (§4.3): a pure zero-trust validator.
//!
//! Grant format: `"category:action"`, `"category:*"`, or `"*"`.
//! Tool name format: `"category.action"`.
//!
//! No implicit trust: an empty or missing grant list always denies.

/// A grant string such as `"filesystem:*"` or `"*"`.
pub type Grant = str;

/// Decompose `"category.action"` into `(category, action)`.
fn split_tool(tool: &str) -> Option<(&str, &str)> {
    tool.split_once('.')
}

/// Evaluate whether `grants` authorizes invoking `tool`.
///
/// Rules, in order: deny if `grants` is empty; allow if `"*"` is present;
/// allow if `"category:*"` is present; allow if the exact `"category:action"`
/// is present; otherwise deny.
pub fn validate(tool: &str, grants: &[String]) -> bool {
    if grants.is_empty() {
        return false;
    }
    if grants.iter().any(|g| g == "*") {
        return true;
    }
    let Some((category, action)) = split_tool(tool) else {
        return false;
    };
    let wildcard = format!("{category}:*");
    let exact = format!("{category}:{action}");
    grants.iter().any(|g| g == &wildcard || g == &exact)
}

/// Error raised by [`validate_or_raise`], carrying enough context for the
/// Execution Kernel to build a `ToolResponse::blocked` (§4.8 step 3).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{skill}.{tool} is not authorized (missing grant: {missing_grant})")]
pub struct GatekeeperError {
    pub skill: String,
    pub tool: String,
    pub missing_grant: String,
}

/// Like [`validate`], but raises a typed error describing the missing grant
/// instead of returning a bare `bool`.
pub fn validate_or_raise(skill: &str, tool: &str, grants: &[String]) -> Result<(), GatekeeperError> {
    if validate(tool, grants) {
        return Ok(());
    }
    let missing_grant = split_tool(tool)
        .map(|(category, action)| format!("{category}:{action}"))
        .unwrap_or_else(|| tool.to_string());
    Err(GatekeeperError {
        skill: skill.to_string(),
        tool: tool.to_string(),
        missing_grant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_grants_always_deny() {
        assert!(!validate("filesystem.read_files", &[]));
    }

    #[test]
    fn test_wildcard_always_allows() {
        assert!(validate("anything.at_all", &grants(&["*"])));
    }

    #[test]
    fn test_category_wildcard_covers_actions() {
        let g = grants(&["filesystem:*"]);
        assert!(validate("filesystem.read_files", &g));
        assert!(validate("filesystem.write_files", &g));
        assert!(!validate("git.status", &g));
    }

    #[test]
    fn test_exact_grant() {
        let g = grants(&["git:status"]);
        assert!(validate("git.status", &g));
        assert!(!validate("git.push", &g));
    }

    #[test]
    fn test_malformed_tool_name_denies() {
        assert!(!validate("no_dot_here", &grants(&["some:thing"])));
    }

    #[test]
    fn test_scenario_calc_filesystem() {
        assert!(!validate("filesystem.read_files", &grants(&[])));
        assert!(validate("filesystem.read_files", &grants(&["filesystem:*"])));
    }

    #[test]
    fn test_validate_or_raise_carries_context() {
        let err = validate_or_raise("calc", "filesystem.read_files", &[]).unwrap_err();
        assert_eq!(err.skill, "calc");
        assert_eq!(err.missing_grant, "filesystem:read_files");
    }

    #[test]
    fn test_validate_or_raise_ok() {
        assert!(validate_or_raise("git", "git.status", &grants(&["git:*"])).is_ok());
    }
}
