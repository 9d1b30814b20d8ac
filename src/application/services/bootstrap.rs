//! One-time bootstrap: file upload plus an ordered remote command sequence.
//!
//! Individual command failures are tolerated — the sequence always runs to
//! the end and the caller gets a per-command result list to judge. Only a
//! plan where nothing succeeded is an error.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, RemoteExecutor, RemoteTarget};
use crate::domain::{BootstrapPlan, LifecycleError};

/// Result of one bootstrap command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub success: bool,
}

/// Upload the plan file, then run every plan command in order.
///
/// # Errors
///
/// Returns `LifecycleError::BootstrapFailed` only when the plan had
/// commands and none of them succeeded. Transport errors on individual
/// commands are downgraded to per-command failures.
pub async fn run_plan(
    remote: &impl RemoteExecutor,
    target: &RemoteTarget,
    plan: &BootstrapPlan,
    reporter: &impl ProgressReporter,
) -> Result<Vec<CommandOutcome>> {
    reporter.step(&format!(
        "uploading {} -> ~/{}",
        plan.upload.local, plan.upload.remote
    ));
    match remote
        .upload(target, &plan.upload.local, &plan.upload.remote)
        .await
    {
        Ok(output) if output.status.success() => {}
        Ok(output) => reporter.warn(&format!(
            "upload failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        Err(e) => reporter.warn(&format!("upload failed: {e:#}")),
    }

    let mut outcomes = Vec::with_capacity(plan.commands.len());
    for command in &plan.commands {
        reporter.step(command);
        let success = match remote.run(target, command).await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                reporter.warn(&format!(
                    "'{command}' exited nonzero: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
                false
            }
            Err(e) => {
                reporter.warn(&format!("'{command}' could not run: {e:#}"));
                false
            }
        };
        outcomes.push(CommandOutcome {
            command: command.clone(),
            success,
        });
    }

    if !outcomes.is_empty() && outcomes.iter().all(|o| !o.success) {
        return Err(LifecycleError::BootstrapFailed {
            address: target.host.clone(),
            total: outcomes.len(),
        }
        .into());
    }
    Ok(outcomes)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
