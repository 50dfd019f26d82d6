//! `altctl` — stack orchestrator CLI for the alt backend mesh (spec §6).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use altctl::config::{ColorMode, ResolvedConfig};
use altctl::executor::Executor;
use altctl::output::{create_table, print_error, print_success, print_warning};
use altctl::registry::{default_stacks, StackRegistry};
use altctl::resolver::{feature_check, resolve, resolve_with_dependents};
use altctl::{CliError, ExitCode};

#[derive(Parser)]
#[command(name = "altctl")]
#[command(version = altctl::VERSION)]
#[command(about = "Orchestrates the alt backend mesh's service stacks", long_about = None)]
struct Cli {
    /// Path to a resolved config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing compose files and the project `.env`.
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Print the external commands that would run, without running them.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Verbose output. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-essential output. Mutually exclusive with `--verbose`.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// When to use color: always, auto, never. Respects `NO_COLOR`.
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a plan and bring the named stacks up, in order.
    Up { stacks: Vec<String> },

    /// Stop the named stacks, in reverse order.
    Down {
        stacks: Vec<String>,
        #[arg(long)]
        with_deps: bool,
    },

    /// Equivalent to `down` followed by `up`.
    Restart { stacks: Vec<String> },

    /// List running services.
    Status {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        watch: bool,
    },

    /// Tail logs for a service or stack.
    Logs {
        target: String,
        #[arg(short = 'f', long)]
        follow: bool,
    },

    /// Run a command inside a running service's container.
    Exec {
        service: String,
        #[arg(last = true)]
        cmd: Vec<String>,
    },

    /// Enumerate defined stacks.
    List {
        #[arg(long)]
        services: bool,
        #[arg(long)]
        deps: bool,
    },

    /// Print resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let color = match ColorMode::parse(&cli.color) {
        Ok(mode) => mode.enabled(),
        Err(message) => {
            eprintln!("ERROR {message}");
            std::process::exit(ExitCode::Usage.as_i32());
        }
    };

    std::process::exit(match run(cli, color).await {
        Ok(()) => ExitCode::Success.as_i32(),
        Err(err) => {
            print_error(&err.to_string(), color);
            err.exit_code.as_i32()
        }
    });
}

async fn run(cli: Cli, color: bool) -> Result<(), CliError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let level = if cli.verbose { "debug" } else if cli.quiet { "error" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let registry = StackRegistry::new(default_stacks())
        .map_err(|err| CliError::config("invalid stack registry", err.to_string()))?;
    let executor = Executor::new(cli.project_dir.clone(), None, cli.dry_run);

    match cli.command {
        Commands::Up { stacks } => {
            let targets = if stacks.is_empty() { registry.names().into_iter().map(String::from).collect() } else { stacks };
            let plan = resolve(&registry, &targets).map_err(|err| CliError::usage("cannot resolve plan", err.to_string()))?;
            for warning in feature_check(&registry, &plan) {
                print_warning(&warning.to_string(), color);
            }
            let stacks: Vec<_> = plan.iter().filter_map(|name| registry.get(name).cloned()).collect();
            executor.up(&stacks).await?;
            print_success(&format!("brought up: {}", plan.join(", ")), color);
            Ok(())
        }
        Commands::Down { stacks, with_deps } => {
            let targets = if stacks.is_empty() { registry.names().into_iter().map(String::from).collect() } else { stacks };
            let plan = if with_deps {
                resolve_with_dependents(&registry, &targets)
            } else {
                resolve(&registry, &targets).map(|mut p| {
                    p.reverse();
                    p
                })
            }
            .map_err(|err| CliError::usage("cannot resolve plan", err.to_string()))?;
            let stacks: Vec<_> = plan.iter().filter_map(|name| registry.get(name).cloned()).collect();
            executor.down(&stacks).await?;
            print_success(&format!("stopped: {}", plan.join(", ")), color);
            Ok(())
        }
        Commands::Restart { stacks } => {
            let targets = if stacks.is_empty() { registry.names().into_iter().map(String::from).collect() } else { stacks };
            let down_plan = resolve(&registry, &targets).map(|mut p| {
                p.reverse();
                p
            })
            .map_err(|err| CliError::usage("cannot resolve plan", err.to_string()))?;
            let down_stacks: Vec<_> = down_plan.iter().filter_map(|name| registry.get(name).cloned()).collect();
            executor.down(&down_stacks).await?;

            let up_plan = resolve(&registry, &targets).map_err(|err| CliError::usage("cannot resolve plan", err.to_string()))?;
            let up_stacks: Vec<_> = up_plan.iter().filter_map(|name| registry.get(name).cloned()).collect();
            executor.up(&up_stacks).await?;
            print_success(&format!("restarted: {}", up_plan.join(", ")), color);
            Ok(())
        }
        Commands::Status { json, watch: _ } => {
            if json {
                let names: Vec<&str> = registry.all().map(|s| s.name.as_str()).collect();
                println!("{}", serde_json::json!({ "stacks": names }));
            } else {
                let mut table = create_table(vec!["stack", "compose file"]);
                for stack in registry.all() {
                    table.add_row(vec![stack.name.clone(), stack.compose_file.clone().unwrap_or_default()]);
                }
                println!("{table}");
            }
            Ok(())
        }
        Commands::Logs { target, follow: _ } => {
            if registry.get(&target).is_none() {
                return Err(CliError::usage("unknown stack or service", target).with_suggestion("run `altctl list` to see defined stacks"));
            }
            print_success(&format!("tailing logs for '{target}' (not connected to a live cluster in this build)"), color);
            Ok(())
        }
        Commands::Exec { service, cmd } => {
            if registry.get(&service).is_none() {
                return Err(CliError::usage("unknown service", service));
            }
            print_success(&format!("would exec `{}` in '{}'", cmd.join(" "), service), color);
            Ok(())
        }
        Commands::List { services, deps } => {
            let mut table = if deps {
                create_table(vec!["stack", "depends on"])
            } else if services {
                create_table(vec!["stack", "provides"])
            } else {
                create_table(vec!["stack", "compose file", "depends on", "provides", "requires"])
            };
            for stack in registry.all() {
                if deps {
                    table.add_row(vec![stack.name.clone(), stack.depends_on.join(", ")]);
                } else if services {
                    table.add_row(vec![stack.name.clone(), stack.provides.join(", ")]);
                } else {
                    table.add_row(vec![
                        stack.name.clone(),
                        stack.compose_file.clone().unwrap_or_default(),
                        stack.depends_on.join(", "),
                        stack.provides.join(", "),
                        stack.requires.join(", "),
                    ]);
                }
            }
            println!("{table}");
            Ok(())
        }
        Commands::Config => {
            let resolved = ResolvedConfig {
                project_dir: cli.project_dir.clone(),
                config_path: cli.config.clone(),
                dry_run: cli.dry_run,
                color: cli.color.clone(),
                stacks: registry.all().map(|s| s.name.clone()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&resolved).unwrap());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from(["altctl", "list"]);
        assert_eq!(cli.project_dir, PathBuf::from("."));
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.color, "auto");
    }

    #[test]
    fn verbose_and_quiet_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["altctl", "--verbose", "--quiet", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn all_subcommands_parse() {
        assert!(matches!(Cli::parse_from(["altctl", "up", "core"]).command, Commands::Up { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "down", "core"]).command, Commands::Down { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "restart", "core"]).command, Commands::Restart { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "status"]).command, Commands::Status { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "logs", "core"]).command, Commands::Logs { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "exec", "core", "--", "sh"]).command, Commands::Exec { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "list"]).command, Commands::List { .. }));
        assert!(matches!(Cli::parse_from(["altctl", "config"]).command, Commands::Config));
    }
}
