//! Extension Fixture System (§4.4 step 4, §9): the mechanism by which a
//! native accelerator replaces a portable handler without the caller
//! knowing. Extensions are declarative `FIXTURES` maps keyed by function
//! name; the loader swaps in the extension implementation for any handler
//! marked `@fixture("extension", "func_name")` post-discovery. No monkey
//! patching at call sites.

use std::collections::HashMap;

use crate::command_table::{CommandEntry, CommandHandler};

/// One extension's `FIXTURES` mapping: `func_name -> implementation`,
/// collected from an `extensions/<name>/` child package.
#[derive(Default, Clone)]
pub struct ExtensionFixtures {
    pub extension_name: String,
    fixtures: HashMap<String, CommandHandler>,
}

impl ExtensionFixtures {
    pub fn new(extension_name: impl Into<String>) -> Self {
        Self { extension_name: extension_name.into(), fixtures: HashMap::new() }
    }

    pub fn with_fixture(mut self, func_name: impl Into<String>, handler: CommandHandler) -> Self {
        self.fixtures.insert(func_name.into(), handler);
        self
    }

    pub fn get(&self, func_name: &str) -> Option<&CommandHandler> {
        self.fixtures.get(func_name)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// Registry of extensions discovered for one skill, keyed by extension name.
#[derive(Default)]
pub struct FixtureRegistry {
    extensions: HashMap<String, ExtensionFixtures>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_extension(&mut self, fixtures: ExtensionFixtures) {
        self.extensions.insert(fixtures.extension_name.clone(), fixtures);
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    fn lookup(&self, extension: &str, func_name: &str) -> Option<&CommandHandler> {
        self.extensions.get(extension)?.get(func_name)
    }

    /// Swap in the extension version of any entry marked with a matching
    /// `@fixture(extension, func_name)` (§4.4 step 4). Entries whose
    /// extension isn't registered, or whose extension doesn't provide that
    /// `func_name`, are left with their portable fallback handler
    /// unchanged.
    pub fn apply(&self, entries: &mut [CommandEntry]) -> usize {
        let mut swapped = 0;
        for entry in entries.iter_mut() {
            let Some((extension, func_name)) = entry.fixture.clone() else { continue };
            if let Some(handler) = self.lookup(&extension, &func_name) {
                entry.handler = handler.clone();
                swapped += 1;
            }
        }
        swapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::CommandFlags;
    use std::sync::Arc;

    fn portable_handler() -> CommandHandler {
        Arc::new(|_args| Box::pin(async { Ok(crate::response::ToolResponse::success(serde_json::json!({"impl": "portable"}))) }))
    }

    fn native_handler() -> CommandHandler {
        Arc::new(|_args| Box::pin(async { Ok(crate::response::ToolResponse::success(serde_json::json!({"impl": "native"}))) }))
    }

    fn entry_with_fixture(fixture: Option<(&str, &str)>) -> CommandEntry {
        CommandEntry {
            skill_name: "kubernetes".to_string(),
            local_name: "get".to_string(),
            category: "kubernetes".to_string(),
            description: "desc".to_string(),
            input_schema: serde_json::json!({}),
            output_type: "object".to_string(),
            flags: CommandFlags::default(),
            routing_keywords: vec![],
            handler: portable_handler(),
            fixture: fixture.map(|(e, f)| (e.to_string(), f.to_string())),
        }
    }

    #[tokio::test]
    async fn test_matching_fixture_swaps_handler() {
        let mut registry = FixtureRegistry::new();
        registry.register_extension(
            ExtensionFixtures::new("native-accel").with_fixture("get", native_handler()),
        );
        let mut entries = vec![entry_with_fixture(Some(("native-accel", "get")))];
        let swapped = registry.apply(&mut entries);
        assert_eq!(swapped, 1);

        let resp = (entries[0].handler)(serde_json::json!({})).await.unwrap();
        assert_eq!(resp.data.unwrap()["impl"], "native");
    }

    #[tokio::test]
    async fn test_no_fixture_marker_keeps_portable() {
        let registry = FixtureRegistry::new();
        let mut entries = vec![entry_with_fixture(None)];
        let swapped = registry.apply(&mut entries);
        assert_eq!(swapped, 0);
        let resp = (entries[0].handler)(serde_json::json!({})).await.unwrap();
        assert_eq!(resp.data.unwrap()["impl"], "portable");
    }

    #[test]
    fn test_unregistered_extension_leaves_portable() {
        let registry = FixtureRegistry::new();
        let mut entries = vec![entry_with_fixture(Some(("missing-ext", "get")))];
        assert_eq!(registry.apply(&mut entries), 0);
    }

    #[test]
    fn test_extension_without_matching_func_name_no_swap() {
        let mut registry = FixtureRegistry::new();
        registry.register_extension(
            ExtensionFixtures::new("native-accel").with_fixture("list", native_handler()),
        );
        let mut entries = vec![entry_with_fixture(Some(("native-accel", "get")))];
        assert_eq!(registry.apply(&mut entries), 0);
    }
}
