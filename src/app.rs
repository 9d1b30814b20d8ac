//! Application context — unified state passed to every command handler.
//!
//! `AppContext` wires the production adapters once, so adding a
//! cross-cutting concern requires one field change here and zero command
//! signature changes.

use anyhow::Result;

use crate::command_runner::TokioCommandRunner;
use crate::domain::LaunchConfig;
use crate::infra::ec2::Ec2Inventory;
use crate::infra::network::TcpReachabilityProbe;
use crate::infra::ssh::SshRemote;
use crate::output::{OutputContext, TerminalReporter};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `SKIFF_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()`. Loading it fails fast when the
/// required environment configuration is absent, before any provider call.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Machine-readable JSON output mode.
    pub json: bool,
    /// Environment-sourced launch configuration.
    pub config: LaunchConfig,
    /// Provider inventory adapter.
    pub inventory: Ec2Inventory<TokioCommandRunner>,
    /// TCP reachability prober.
    pub probe: TcpReachabilityProbe,
    /// SSH/SCP remote executor.
    pub remote: SshRemote<TokioCommandRunner>,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment configuration is incomplete
    /// (missing `SKIFF_KEY_NAME`, invalid port).
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("SKIFF_YES").is_ok();
        let config = LaunchConfig::from_env()?;

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            json: flags.json,
            inventory: Ec2Inventory::default_runner(&config.region),
            probe: TcpReachabilityProbe,
            remote: SshRemote::default_runner(&config.key_name),
            config,
            non_interactive: flags.yes || ci_env,
        })
    }

    /// Returns a reporter for application services to emit progress through.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `SKIFF_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
