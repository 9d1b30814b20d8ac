//! `skiff go` — interactive shell hand-off to the instance.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::connect::{self, ConnectOutcome};

/// Run `skiff go`.
///
/// Blocks for the whole session; the process exit code follows the remote
/// session's exit status.
///
/// # Errors
///
/// Returns an error if no instance is running, the lookup fails, or the
/// session cannot be opened.
pub async fn run(app: &AppContext) -> Result<()> {
    match connect::open_session(&app.inventory, &app.remote, &app.config).await? {
        ConnectOutcome::Session(status) => {
            if !status.success() {
                std::process::exit(status.code().unwrap_or(1));
            }
            Ok(())
        }
        ConnectOutcome::NothingRunning => {
            anyhow::bail!("No instance running. Try 'skiff up' first.")
        }
    }
}
