//! CLI error shape and exit codes (spec §6, §7): every error the CLI
//! surfaces carries `{summary, detail, suggestion, exit-code}` and is
//! rendered with color when permitted.

use std::fmt;

/// Exit codes for `altctl`, per the CLI surface table in spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Compose = 3,
    Config = 4,
    Timeout = 5,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A structured CLI-facing error. Distinct from `alt_types::CoreError`:
/// this crate never talks to the RPC surface, so it has no need for the
/// safe-error translator's concerns (internal chains, Error IDs).
#[derive(Debug, Clone)]
pub struct CliError {
    pub summary: String,
    pub detail: String,
    pub suggestion: Option<String>,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn usage(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { summary: summary.into(), detail: detail.into(), suggestion: None, exit_code: ExitCode::Usage }
    }

    pub fn compose(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { summary: summary.into(), detail: detail.into(), suggestion: None, exit_code: ExitCode::Compose }
    }

    pub fn config(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { summary: summary.into(), detail: detail.into(), suggestion: None, exit_code: ExitCode::Config }
    }

    pub fn timeout(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { summary: summary.into(), detail: detail.into(), suggestion: None, exit_code: ExitCode::Timeout }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nsuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_the_surface_table() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Usage.as_i32(), 2);
        assert_eq!(ExitCode::Compose.as_i32(), 3);
        assert_eq!(ExitCode::Config.as_i32(), 4);
        assert_eq!(ExitCode::Timeout.as_i32(), 5);
    }

    #[test]
    fn display_includes_suggestion_when_present() {
        let err = CliError::usage("unknown stack", "'bogus' is not defined")
            .with_suggestion("run `altctl list` to see defined stacks");
        let rendered = err.to_string();
        assert!(rendered.contains("unknown stack"));
        assert!(rendered.contains("suggestion"));
    }
}
