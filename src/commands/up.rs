//! `skiff up` — create the instance if absent, wait for it, bootstrap it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::bootstrap::CommandOutcome;
use crate::application::services::lifecycle::{self, UpOutcome};
use crate::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::domain::PollPolicies;
use crate::infra::ec2;
use crate::infra::plan::YamlPlanStore;
use crate::output::OutputContext;

/// Arguments for the up command.
#[derive(Args, Default)]
pub struct UpArgs {
    /// Bootstrap plan file (overrides SKIFF_BOOTSTRAP and ~/.skiff/bootstrap.yaml)
    #[arg(long, value_name = "PATH")]
    pub plan: Option<PathBuf>,
}

/// Run `skiff up`.
///
/// # Errors
///
/// Returns an error on any fatal lifecycle condition: multiple instances
/// found, provider rejected creation, boot/reachability timeout, tag write
/// failure, or a fully failed bootstrap.
pub async fn run(args: &UpArgs, app: &AppContext) -> Result<()> {
    ec2::check_aws_cli(&TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT)).await?;
    let plan = YamlPlanStore.load(args.plan.as_deref())?;

    let reporter = app.terminal_reporter();
    let outcome = tokio::select! {
        result = lifecycle::ensure_up(
            &app.inventory,
            &app.probe,
            &app.remote,
            &reporter,
            &app.config,
            &plan,
            PollPolicies::default(),
        ) => result?,
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!(
                "interrupted. Re-run 'skiff up' to resume from the provider's \
                 current state, or 'skiff down' to clean up."
            )
        }
    };

    match outcome {
        UpOutcome::AlreadyRunning(instance) => {
            app.output.info(&format!(
                "Instance already running at: {}",
                instance.public_address
            ));
            print_next_steps(&app.output);
        }
        UpOutcome::Provisioned {
            instance,
            bootstrap,
        } => {
            report_bootstrap(&app.output, &bootstrap);
            app.output.success(&format!(
                "Instance now running at: {}",
                instance.public_address
            ));
            app.output.kv("ID", &instance.id);
            print_next_steps(&app.output);
        }
    }
    Ok(())
}

fn report_bootstrap(ctx: &OutputContext, outcomes: &[CommandOutcome]) {
    let failed: Vec<&CommandOutcome> = outcomes.iter().filter(|o| !o.success).collect();
    if failed.is_empty() {
        return;
    }
    ctx.warn(&format!(
        "{} of {} bootstrap commands failed:",
        failed.len(),
        outcomes.len()
    ));
    for outcome in failed {
        ctx.kv("failed", &outcome.command);
    }
    ctx.warn("The instance is up; re-run the failed steps over 'skiff go'.");
}

fn print_next_steps(ctx: &OutputContext) {
    ctx.kv("Connect", "skiff go");
    ctx.kv("Tear down", "skiff down");
}
