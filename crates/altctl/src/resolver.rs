//! Dependency resolver (spec §4.7): turns a set of target stack names
//! into a topologically sound plan, and checks the plan for
//! unsatisfied feature requirements.

use std::collections::HashSet;

use thiserror::Error;

use crate::registry::StackRegistry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown stack '{0}'")]
    UnknownStack(String),
}

/// A warning surfaced by `FeatureCheck`: `stack` requires `feature`,
/// which no stack in the plan provides; `suggested` names stacks in
/// the registry (not necessarily in the plan) that do provide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureWarning {
    pub stack: String,
    pub feature: String,
    pub suggested: Vec<String>,
}

impl std::fmt::Display for FeatureWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stack '{}' requires feature '{}'", self.stack, self.feature)?;
        if !self.suggested.is_empty() {
            write!(f, ", provided by: {}", self.suggested.join(", "))?;
        }
        Ok(())
    }
}

/// Returns a topological ordering of `targets` and their transitive
/// dependencies: every dependency precedes its dependent (spec §8,
/// invariant 5).
pub fn resolve(registry: &StackRegistry, targets: &[String]) -> Result<Vec<String>, ResolveError> {
    for target in targets {
        if registry.get(target).is_none() {
            return Err(ResolveError::UnknownStack(target.clone()));
        }
    }

    let mut plan = Vec::new();
    let mut seen = HashSet::new();

    fn visit(registry: &StackRegistry, name: &str, seen: &mut HashSet<String>, plan: &mut Vec<String>) {
        if seen.contains(name) {
            return;
        }
        seen.insert(name.to_string());
        if let Some(stack) = registry.get(name) {
            for dep in &stack.depends_on {
                visit(registry, dep, seen, plan);
            }
        }
        plan.push(name.to_string());
    }

    for target in targets {
        visit(registry, target, &mut seen, &mut plan);
    }
    Ok(plan)
}

/// For `down`: includes every stack that transitively depends on a
/// target, in reverse topological order (dependents stopped first).
pub fn resolve_with_dependents(registry: &StackRegistry, targets: &[String]) -> Result<Vec<String>, ResolveError> {
    for target in targets {
        if registry.get(target).is_none() {
            return Err(ResolveError::UnknownStack(target.clone()));
        }
    }
    let target_set: HashSet<&str> = targets.iter().map(String::as_str).collect();

    let dependents_of = |name: &str| -> bool {
        // A stack is included if it equals a target or (transitively)
        // depends on one.
        fn depends_transitively(registry: &StackRegistry, from: &str, on: &HashSet<&str>, seen: &mut HashSet<String>) -> bool {
            if seen.contains(from) {
                return false;
            }
            seen.insert(from.to_string());
            let Some(stack) = registry.get(from) else { return false };
            for dep in &stack.depends_on {
                if on.contains(dep.as_str()) || depends_transitively(registry, dep, on, seen) {
                    return true;
                }
            }
            false
        }
        target_set.contains(name) || depends_transitively(registry, name, &target_set, &mut HashSet::new())
    };

    let included: Vec<String> = registry.all().map(|s| s.name.clone()).filter(|name| dependents_of(name)).collect();

    // Topological order over the induced subgraph, then reversed so
    // dependents come before the dependencies they need to outlive.
    let mut plan = resolve(registry, &included)?;
    plan.retain(|name| included.contains(name));
    plan.reverse();
    Ok(plan)
}

/// Names every required-but-unprovided feature across `plan` (spec §8,
/// scenario 5). Does not fail the resolve: an unsatisfied requirement
/// is a warning, never an error.
pub fn feature_check(registry: &StackRegistry, plan: &[String]) -> Vec<FeatureWarning> {
    let provided: HashSet<&str> = plan
        .iter()
        .filter_map(|name| registry.get(name))
        .flat_map(|stack| stack.provides.iter().map(String::as_str))
        .collect();

    let mut warnings = Vec::new();
    for name in plan {
        let Some(stack) = registry.get(name) else { continue };
        for feature in &stack.requires {
            if !provided.contains(feature.as_str()) {
                let suggested: Vec<String> = registry
                    .all()
                    .filter(|candidate| candidate.provides.iter().any(|p| p == feature))
                    .map(|candidate| candidate.name.clone())
                    .collect();
                warnings.push(FeatureWarning { stack: name.clone(), feature: feature.clone(), suggested });
            }
        }
    }
    warnings
}
