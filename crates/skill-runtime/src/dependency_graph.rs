//! Dependency resolution for the Skill Registry & Loader (§4.4): a
//! topological sort over the skill dependency DAG with cycle detection.
//! Failure of any dependency aborts the load with a precise path.

use std::collections::{HashMap, HashSet};

use crate::errors::{Result, RuntimeError};

/// Topologically sort `skills` (name -> its declared dependency names) so
/// that every skill appears after all of its dependencies.
///
/// Unknown dependencies (names not present as keys in `skills`) are treated
/// as already-satisfied external references and do not affect ordering —
/// the registry loads only the skills it was given.
pub fn topological_order(skills: &HashMap<String, Vec<String>>) -> Result<Vec<String>> {
    let mut order = Vec::with_capacity(skills.len());
    let mut permanent = HashSet::new();
    let mut temporary = HashSet::new();

    let mut names: Vec<&String> = skills.keys().collect();
    names.sort();

    for name in names {
        if !permanent.contains(name) {
            visit(name, skills, &mut permanent, &mut temporary, &mut order, &mut Vec::new())?;
        }
    }
    Ok(order)
}

fn visit(
    name: &str,
    skills: &HashMap<String, Vec<String>>,
    permanent: &mut HashSet<String>,
    temporary: &mut HashSet<String>,
    order: &mut Vec<String>,
    path: &mut Vec<String>,
) -> Result<()> {
    if permanent.contains(name) {
        return Ok(());
    }
    if temporary.contains(name) {
        path.push(name.to_string());
        return Err(RuntimeError::ConfigError(format!(
            "dependency cycle detected: {}",
            path.join(" -> ")
        )));
    }

    temporary.insert(name.to_string());
    path.push(name.to_string());

    if let Some(deps) = skills.get(name) {
        let mut deps = deps.clone();
        deps.sort();
        for dep in &deps {
            if skills.contains_key(dep) {
                visit(dep, skills, permanent, temporary, order, path)?;
            }
        }
    }

    path.pop();
    temporary.remove(name);
    permanent.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}

/// Check that every dependency a skill declares is present among the known
/// skill names, returning the first missing `(skill, missing_dependency)`.
pub fn check_missing_dependencies(skills: &HashMap<String, Vec<String>>) -> Option<(String, String)> {
    let mut names: Vec<&String> = skills.keys().collect();
    names.sort();
    for name in names {
        let deps = &skills[name];
        for dep in deps {
            if !skills.contains_key(dep) {
                return Some((name.clone(), dep.clone()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(name, deps)| (name.to_string(), deps.iter().map(|d| d.to_string()).collect()))
            .collect()
    }

    fn index_of(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_linear_chain_ordering() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let order = topological_order(&g).unwrap();
        assert!(index_of(&order, "c") < index_of(&order, "b"));
        assert!(index_of(&order, "b") < index_of(&order, "a"));
    }

    #[test]
    fn test_diamond_dependency() {
        let g = graph(&[("d", &["b", "c"]), ("b", &["a"]), ("c", &["a"]), ("a", &[])]);
        let order = topological_order(&g).unwrap();
        assert!(index_of(&order, "a") < index_of(&order, "b"));
        assert!(index_of(&order, "a") < index_of(&order, "c"));
        assert!(index_of(&order, "b") < index_of(&order, "d"));
        assert!(index_of(&order, "c") < index_of(&order, "d"));
    }

    #[test]
    fn test_cycle_is_rejected_with_path() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let err = topological_order(&g).unwrap_err();
        match err {
            RuntimeError::ConfigError(msg) => assert!(msg.contains("cycle")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_self_cycle_is_rejected() {
        let g = graph(&[("a", &["a"])]);
        assert!(topological_order(&g).is_err());
    }

    #[test]
    fn test_external_dependency_ignored() {
        let g = graph(&[("a", &["not-in-registry"])]);
        let order = topological_order(&g).unwrap();
        assert_eq!(order, vec!["a".to_string()]);
    }

    #[test]
    fn test_missing_dependency_detection() {
        let g = graph(&[("a", &["ghost"]), ("b", &[])]);
        let missing = check_missing_dependencies(&g);
        assert_eq!(missing, Some(("a".to_string(), "ghost".to_string())));
        assert!(check_missing_dependencies(&graph(&[("b", &[])])).is_none());
    }

    #[test]
    fn test_empty_graph() {
        let g: HashMap<String, Vec<String>> = HashMap::new();
        assert!(topological_order(&g).unwrap().is_empty());
    }
}
