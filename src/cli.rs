//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Disposable cloud GPU dev boxes
#[derive(Parser)]
#[command(
    name = "skiff",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the instance if absent, wait for it, and bootstrap it
    Up(commands::up::UpArgs),

    /// Open an interactive shell on the instance
    #[command(alias = "connect")]
    Go,

    /// Terminate the instance
    #[command(alias = "terminate")]
    Down(commands::down::DownArgs),

    /// Show the instance state and address
    Status,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
        } = self;

        if let Command::Version = command {
            return commands::version::run(json);
        }

        let yes = matches!(command, Command::Down(ref args) if args.yes);
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
            yes,
        })?;

        match command {
            Command::Up(args) => commands::up::run(&args, &app).await,
            Command::Go => commands::go::run(&app).await,
            Command::Down(args) => commands::down::run(&args, &app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Version => unreachable!("handled above"),
        }
    }
}
