//! Resolved CLI configuration (spec §6, `config` command: "print
//! resolved config"). Distinct from `alt-config`'s `AppConfig`: this is
//! the orchestrator's own view of where it's pointed, not the backend
//! mesh's runtime configuration.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Auto,
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            other => Err(format!("invalid --color value '{other}' (expected always|auto|never)")),
        }
    }

    /// `NO_COLOR` (https://no-color.org) always wins over `auto`.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub project_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
    pub color: String,
    pub stacks: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_env_overrides_auto() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!ColorMode::Auto.enabled());
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    fn always_ignores_no_color() {
        std::env::set_var("NO_COLOR", "1");
        assert!(ColorMode::Always.enabled());
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    fn rejects_unknown_color_value() {
        assert!(ColorMode::parse("rainbow").is_err());
    }
}
