//! Stack registry (spec §4.7, §3): declares the named set of service
//! stacks at program start and validates the dependency graph once, at
//! load time — a cycle is a programmer bug, not a runtime failure.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// A named bundle of co-deployed services (spec §3, "Stack").
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub compose_file: Option<String>,
    pub depends_on: Vec<String>,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), compose_file: None, depends_on: Vec::new(), provides: Vec::new(), requires: Vec::new() }
    }

    pub fn compose_file(mut self, path: impl Into<String>) -> Self {
        self.compose_file = Some(path.into());
        self
    }

    pub fn depends_on(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn provides(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.provides = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn requires(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.requires = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("stack '{0}' depends on undefined stack '{1}'")]
    UnknownDependency(String, String),

    #[error("dependency cycle detected, involving stack '{0}'")]
    Cycle(String),

    #[error("'base' must have no dependencies, but declares {0:?}")]
    BaseHasDependencies(Vec<String>),

    #[error("duplicate stack name '{0}'")]
    DuplicateName(String),
}

/// Validated, immutable-after-construction set of stack definitions.
#[derive(Debug, Clone)]
pub struct StackRegistry {
    stacks: HashMap<String, Stack>,
}

impl StackRegistry {
    /// Validates invariants (i)-(iii) from spec §3 and rejects cycles
    /// before the registry is ever handed to a resolver.
    pub fn new(stacks: Vec<Stack>) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for stack in stacks {
            if map.contains_key(&stack.name) {
                return Err(RegistryError::DuplicateName(stack.name));
            }
            map.insert(stack.name.clone(), stack);
        }

        if let Some(base) = map.get("base") {
            if !base.depends_on.is_empty() {
                return Err(RegistryError::BaseHasDependencies(base.depends_on.clone()));
            }
        }

        for stack in map.values() {
            for dep in &stack.depends_on {
                if !map.contains_key(dep) {
                    return Err(RegistryError::UnknownDependency(stack.name.clone(), dep.clone()));
                }
            }
        }

        let registry = Self { stacks: map };
        registry.check_acyclic()?;
        Ok(registry)
    }

    fn check_acyclic(&self) -> Result<(), RegistryError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }
        let mut marks: HashMap<&str, Mark> = HashMap::new();

        fn visit<'a>(
            name: &'a str,
            stacks: &'a HashMap<String, Stack>,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<(), RegistryError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(RegistryError::Cycle(name.to_string())),
                None => {}
            }
            marks.insert(name, Mark::Visiting);
            if let Some(stack) = stacks.get(name) {
                for dep in &stack.depends_on {
                    visit(dep, stacks, marks)?;
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        for name in self.stacks.keys() {
            visit(name, &self.stacks, &mut marks)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Stack> {
        self.stacks.get(name)
    }

    pub fn names(&self) -> HashSet<&str> {
        self.stacks.keys().map(String::as_str).collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &Stack> {
        self.stacks.values()
    }
}

/// The default stack set for the reading-platform mesh.
pub fn default_stacks() -> Vec<Stack> {
    vec![
        Stack::new("base"),
        Stack::new("database")
            .compose_file("compose/database.yml")
            .depends_on(["base"])
            .provides(["storage"]),
        Stack::new("kratos")
            .compose_file("compose/kratos.yml")
            .depends_on(["base"])
            .provides(["auth"]),
        Stack::new("workers")
            .compose_file("compose/workers.yml")
            .depends_on(["base", "database"])
            .provides(["search"]),
        Stack::new("core")
            .compose_file("compose/core.yml")
            .depends_on(["base", "database", "kratos"])
            .provides(["api"])
            .requires(["search"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stacks_load_without_error() {
        StackRegistry::new(default_stacks()).expect("default stack set must be valid");
    }

    #[test]
    fn rejects_unknown_dependency() {
        let stacks = vec![Stack::new("base"), Stack::new("app").depends_on(["missing"])];
        let result = StackRegistry::new(stacks);
        assert_eq!(result.unwrap_err(), RegistryError::UnknownDependency("app".to_string(), "missing".to_string()));
    }

    #[test]
    fn rejects_cycle() {
        let stacks = vec![
            Stack::new("base"),
            Stack::new("a").depends_on(["b"]),
            Stack::new("b").depends_on(["a"]),
        ];
        let result = StackRegistry::new(stacks);
        assert!(matches!(result, Err(RegistryError::Cycle(_))));
    }

    #[test]
    fn rejects_base_with_dependencies() {
        let stacks = vec![Stack::new("base").depends_on(["other"]), Stack::new("other")];
        let result = StackRegistry::new(stacks);
        assert!(matches!(result, Err(RegistryError::BaseHasDependencies(_))));
    }

    #[test]
    fn rejects_duplicate_name() {
        let stacks = vec![Stack::new("base"), Stack::new("base")];
        assert_eq!(StackRegistry::new(stacks).unwrap_err(), RegistryError::DuplicateName("base".to_string()));
    }
}
