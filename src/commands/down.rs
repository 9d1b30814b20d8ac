//! `skiff down` — terminate the instance.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, DownOutcome};
use crate::output::progress;

/// Arguments for the down command.
#[derive(Args, Default)]
pub struct DownArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `skiff down`.
///
/// Terminating nothing is a success: the command exits 0 whether or not an
/// instance existed.
///
/// # Errors
///
/// Returns an error if the lookup finds multiple instances or the
/// terminate call is rejected.
pub async fn run(args: &DownArgs, app: &AppContext) -> Result<()> {
    if !args.yes && !app.confirm("Terminate the managed instance?", false)? {
        println!("Cancelled.");
        return Ok(());
    }

    let spinner = app
        .output
        .show_progress()
        .then(|| progress::spinner("terminating..."));

    let outcome = lifecycle::tear_down(&app.inventory, &app.config.name_tag).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome? {
        DownOutcome::Terminated { id } => {
            app.output.success(&format!("Instance {id} terminated."));
        }
        DownOutcome::NothingRunning => {
            app.output.info("No instance running; nothing to terminate.");
        }
    }
    Ok(())
}
