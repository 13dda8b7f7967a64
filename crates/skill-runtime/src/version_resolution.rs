//! Version resolution for the Skill Registry & Loader (§4.4): a
//! non-blocking chain of fallbacks, tried in order, to determine the
//! installed version of a skill:
//!
//! `.omni-lock.json` -> `SKILL.md` -> `git rev-parse HEAD` (+ dirty marker) -> `unknown`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::skill_md::find_skill_md;

/// Where a resolved version string came from, for diagnostics and the
/// registry's unload/reload bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    OmniLock,
    SkillMd,
    GitRevision,
    Unknown,
}

/// The resolved version plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersion {
    pub version: String,
    pub source: VersionSource,
}

impl ResolvedVersion {
    fn unknown() -> Self {
        Self { version: "unknown".to_string(), source: VersionSource::Unknown }
    }
}

/// Minimal shape of a `.omni-lock.json` file: just the field this resolver cares about.
#[derive(Debug, Deserialize)]
struct OmniLock {
    version: Option<String>,
}

/// Resolve a skill's version by walking the fallback chain (§4.4). Never
/// fails: the worst case is [`VersionSource::Unknown`].
pub fn resolve_version(skill_dir: &Path) -> ResolvedVersion {
    if let Some(version) = from_omni_lock(skill_dir) {
        return ResolvedVersion { version, source: VersionSource::OmniLock };
    }
    if let Some(version) = from_skill_md(skill_dir) {
        return ResolvedVersion { version, source: VersionSource::SkillMd };
    }
    if let Some(version) = from_git_revision(skill_dir) {
        return ResolvedVersion { version, source: VersionSource::GitRevision };
    }
    ResolvedVersion::unknown()
}

fn from_omni_lock(skill_dir: &Path) -> Option<String> {
    let path = skill_dir.join(".omni-lock.json");
    let contents = std::fs::read_to_string(path).ok()?;
    let lock: OmniLock = serde_json::from_str(&contents).ok()?;
    lock.version.filter(|v| !v.is_empty())
}

fn from_skill_md(skill_dir: &Path) -> Option<String> {
    let path = find_skill_md(skill_dir)?;
    let content = crate::skill_md::parse_skill_md(&path).ok()?;
    content
        .frontmatter
        .extra
        .get("version")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn from_git_revision(skill_dir: &Path) -> Option<String> {
    let repo = git2::Repository::discover(skill_dir).ok()?;
    let head = repo.head().ok()?;
    let commit = head.peel_to_commit().ok()?;
    let short = commit.id().to_string()[..12.min(commit.id().to_string().len())].to_string();

    let dirty = repo
        .statuses(Some(git2::StatusOptions::new().include_untracked(false)))
        .map(|statuses| !statuses.is_empty())
        .unwrap_or(false);

    Some(if dirty { format!("{short}-dirty") } else { short })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_omni_lock_takes_priority() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".omni-lock.json"), r#"{"version": "1.2.3"}"#).unwrap();
        std::fs::write(
            dir.path().join("SKILL.md"),
            "---\nname: x\ndescription: y\nversion: 9.9.9\n---\nbody",
        )
        .unwrap();
        let resolved = resolve_version(dir.path());
        assert_eq!(resolved.version, "1.2.3");
        assert_eq!(resolved.source, VersionSource::OmniLock);
    }

    #[test]
    fn test_skill_md_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("SKILL.md"),
            "---\nname: x\ndescription: y\nversion: 2.0.0\n---\nbody",
        )
        .unwrap();
        let resolved = resolve_version(dir.path());
        assert_eq!(resolved.version, "2.0.0");
        assert_eq!(resolved.source, VersionSource::SkillMd);
    }

    #[test]
    fn test_unknown_when_nothing_resolves() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_version(dir.path());
        assert_eq!(resolved.version, "unknown");
        assert_eq!(resolved.source, VersionSource::Unknown);
    }

    #[test]
    fn test_malformed_omni_lock_falls_through() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".omni-lock.json"), "not json").unwrap();
        let resolved = resolve_version(dir.path());
        assert_eq!(resolved.source, VersionSource::Unknown);
    }
}
