//! Compose executor (spec §4.7): a thin wrapper over an external
//! `docker compose` invocation, plus the `up`/`down` state machine for
//! a plan of stacks.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::CliError;
use crate::registry::Stack;

/// Per-stack outcome of a single `up`/`down` step (spec §4.7, "State
/// machine for a stack during `up`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    Starting,
    Running,
    Failed,
}

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const SHUTDOWN_WRAPPER_MARGIN: Duration = Duration::from_secs(30);

pub struct Executor {
    dry_run: bool,
    project_dir: PathBuf,
    env_file: Option<PathBuf>,
}

impl Executor {
    pub fn new(project_dir: PathBuf, env_file: Option<PathBuf>, dry_run: bool) -> Self {
        Self { dry_run, project_dir, env_file }
    }

    fn base_argv(&self, compose_file: &str) -> Vec<String> {
        let mut argv = vec!["compose".to_string(), "-f".to_string(), compose_file.to_string()];
        if let Some(env_file) = &self.env_file {
            argv.push("--env-file".to_string());
            argv.push(env_file.display().to_string());
        }
        argv
    }

    /// Brings up every stack in `plan`, in order. A failed start aborts
    /// the remaining plan without rolling back stacks already running
    /// (spec §9, "Open question — orphan rollback": answered no).
    pub async fn up(&self, plan: &[Stack]) -> Result<Vec<(String, StackState)>, CliError> {
        let mut outcomes = Vec::new();
        for stack in plan {
            info!(stack = %stack.name, "starting stack");
            let Some(compose_file) = &stack.compose_file else {
                outcomes.push((stack.name.clone(), StackState::Running));
                continue;
            };
            let mut argv = self.base_argv(compose_file);
            argv.extend(["up".to_string(), "-d".to_string()]);

            match self.run(&argv).await {
                Ok(()) => outcomes.push((stack.name.clone(), StackState::Running)),
                Err(err) => {
                    warn!(stack = %stack.name, error = %err, "stack failed to start");
                    outcomes.push((stack.name.clone(), StackState::Failed));
                    return Err(CliError::compose(
                        format!("stack '{}' failed to start", stack.name),
                        err.to_string(),
                    ));
                }
            }
        }
        Ok(outcomes)
    }

    /// Stops every stack in `plan`, in the order given (callers pass a
    /// reverse-topological plan from `resolve_with_dependents`), each
    /// under the per-stack shutdown timeout plus a wrapper deadline.
    pub async fn down(&self, plan: &[Stack]) -> Result<(), CliError> {
        for stack in plan {
            info!(stack = %stack.name, "stopping stack");
            let Some(compose_file) = &stack.compose_file else { continue };
            let mut argv = self.base_argv(compose_file);
            argv.extend(["down".to_string(), "--timeout".to_string(), DEFAULT_SHUTDOWN_TIMEOUT.as_secs().to_string()]);

            let wrapper_deadline = DEFAULT_SHUTDOWN_TIMEOUT + SHUTDOWN_WRAPPER_MARGIN;
            match tokio::time::timeout(wrapper_deadline, self.run(&argv)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(CliError::compose(format!("stack '{}' failed to stop", stack.name), err.to_string())),
                Err(_) => {
                    return Err(CliError::timeout(
                        format!("stack '{}' did not stop within {:?}", stack.name, wrapper_deadline),
                        "shutdown wrapper deadline exceeded",
                    ))
                }
            }
        }
        Ok(())
    }

    async fn run(&self, argv: &[String]) -> anyhow::Result<()> {
        if self.dry_run {
            println!("docker {}", argv.join(" "));
            return Ok(());
        }

        let status = tokio::process::Command::new("docker")
            .args(argv)
            .current_dir(&self.project_dir)
            .status()
            .await?;

        if !status.success() {
            anyhow::bail!("docker {} exited with {}", argv.join(" "), status);
        }
        Ok(())
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Stack;

    #[tokio::test]
    async fn dry_run_never_spawns_a_process() {
        let executor = Executor::new(PathBuf::from("."), None, true);
        let plan = vec![Stack::new("base").compose_file("compose/base.yml")];
        let outcomes = executor.up(&plan).await.unwrap();
        assert_eq!(outcomes, vec![("base".to_string(), StackState::Running)]);
    }

    #[tokio::test]
    async fn stack_with_no_compose_file_counts_as_running() {
        let executor = Executor::new(PathBuf::from("."), None, true);
        let plan = vec![Stack::new("base")];
        let outcomes = executor.up(&plan).await.unwrap();
        assert_eq!(outcomes, vec![("base".to_string(), StackState::Running)]);
    }
}
