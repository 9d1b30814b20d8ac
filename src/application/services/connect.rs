//! Interactive session hand-off to the managed instance.

use anyhow::{Context, Result};

use crate::application::ports::{CloudInventory, RemoteExecutor, RemoteTarget};
use crate::application::services::lifecycle;
use crate::domain::LaunchConfig;

/// What `open_session` did.
pub enum ConnectOutcome {
    /// A foreground shell session ran to completion with this status.
    Session(std::process::ExitStatus),
    /// No instance carries the discovery tag; nothing was contacted.
    NothingRunning,
}

/// Locate the managed instance and hand the terminal over to an interactive
/// shell session on it.
///
/// # Errors
///
/// Returns an error if `locate` fails (including the multiple-instances
/// case) or the session cannot be opened.
pub async fn open_session(
    inventory: &impl CloudInventory,
    remote: &impl RemoteExecutor,
    config: &LaunchConfig,
) -> Result<ConnectOutcome> {
    match lifecycle::locate(inventory, &config.name_tag).await? {
        Some(instance) => {
            let target = RemoteTarget::for_instance(&instance, config);
            let status = remote
                .open_shell(&target)
                .await
                .context("opening shell session")?;
            Ok(ConnectOutcome::Session(status))
        }
        None => Ok(ConnectOutcome::NothingRunning),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
