//! Instance lifecycle controller: locate, create-if-absent, poll, tag,
//! bootstrap, terminate.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Current state is always re-derived from a fresh inventory query — the
//! controller never trusts prior local state, so an interrupted `up` can be
//! re-run and picks up where the provider says things stand.

use anyhow::{Context, Result};

use crate::application::ports::{
    CloudInventory, ProgressReporter, ReachabilityProbe, RemoteExecutor, RemoteTarget,
};
use crate::application::services::bootstrap::{self, CommandOutcome};
use crate::domain::{
    BootstrapPlan, LaunchConfig, LifecycleError, LifecycleState, ManagedInstance, PollPolicies,
    RetryPolicy,
};

/// What `ensure_up` did.
#[derive(Debug)]
pub enum UpOutcome {
    /// An instance with the discovery tag was already up; nothing was
    /// created and the remote executor was never contacted.
    AlreadyRunning(ManagedInstance),
    /// A fresh instance was created, tagged, and bootstrapped.
    Provisioned {
        instance: ManagedInstance,
        bootstrap: Vec<CommandOutcome>,
    },
}

/// What `tear_down` did.
pub enum DownOutcome {
    Terminated { id: String },
    /// Terminating nothing is a no-op success, not an error.
    NothingRunning,
}

/// Find the managed instance by its discovery tag.
///
/// # Errors
///
/// Returns `LifecycleError::MultipleInstances` if more than one
/// non-terminated instance carries the tag. The caller must abort; this is
/// never auto-resolved.
pub async fn locate(
    inventory: &impl CloudInventory,
    name_tag: &str,
) -> Result<Option<ManagedInstance>> {
    let mut matches = inventory
        .list_by_tag(name_tag)
        .await
        .context("querying instance inventory")?;
    if matches.len() > 1 {
        return Err(LifecycleError::MultipleInstances {
            tag: name_tag.to_string(),
            count: matches.len(),
        }
        .into());
    }
    Ok(matches.pop())
}

/// Poll the provider-reported boot state until it says `running`.
///
/// # Errors
///
/// Returns `LifecycleError::BootTimeout` once the policy's attempt bound is
/// exhausted, or any error from the inventory query itself.
pub async fn wait_for_running(
    inventory: &impl CloudInventory,
    id: &str,
    policy: RetryPolicy,
    reporter: &impl ProgressReporter,
) -> Result<ManagedInstance> {
    for attempt in 1..=policy.max_attempts {
        let instance = inventory.describe(id).await.context("polling boot state")?;
        if instance.state.is_running() {
            return Ok(instance);
        }
        reporter.step(&format!(
            "booting instance ({attempt}/{})...",
            policy.max_attempts
        ));
        tokio::time::sleep(policy.interval).await;
    }
    Err(LifecycleError::BootTimeout {
        id: id.to_string(),
        attempts: policy.max_attempts,
    }
    .into())
}

/// Poll TCP reachability on the admin port until a connection succeeds.
///
/// Never called before the provider reports `running` — `ensure_up` orders
/// the two loops strictly.
///
/// # Errors
///
/// Returns `LifecycleError::Unreachable` once the policy's attempt bound is
/// exhausted, or any probe transport error.
pub async fn wait_for_reachable(
    probe: &impl ReachabilityProbe,
    instance: &ManagedInstance,
    port: u16,
    policy: RetryPolicy,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    for _ in 1..=policy.max_attempts {
        if probe.probe_tcp(&instance.public_address, port).await? {
            return Ok(());
        }
        reporter.step("waiting for SSH (this might take a minute)...");
        tokio::time::sleep(policy.interval).await;
    }
    Err(LifecycleError::Unreachable {
        id: instance.id.clone(),
        address: instance.public_address.clone(),
        port,
        attempts: policy.max_attempts,
    }
    .into())
}

/// Bring the managed instance up: locate → create-if-absent →
/// wait-for-running → tag → wait-for-reachable → bootstrap.
///
/// Idempotent: a second call finds the existing instance and returns it
/// without creating or re-bootstrapping anything.
///
/// # Errors
///
/// Returns a `LifecycleError` for each fatal stage: multiple instances
/// found, provider rejected creation, boot or reachability polling exceeded
/// its bound, or the tag write failed (the orphaned instance id is named in
/// the error). Bootstrap command failures are NOT fatal — they come back in
/// the outcome list — unless no command succeeds at all.
pub async fn ensure_up(
    inventory: &impl CloudInventory,
    probe: &impl ReachabilityProbe,
    remote: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    config: &LaunchConfig,
    plan: &BootstrapPlan,
    policies: PollPolicies,
) -> Result<UpOutcome> {
    if let Some(existing) = locate(inventory, &config.name_tag).await? {
        return Ok(UpOutcome::AlreadyRunning(existing));
    }

    reporter.step("creating instance...");
    let created = inventory
        .create(config)
        .await
        .map_err(|e| LifecycleError::Provisioning {
            reason: format!("{e:#}"),
        })?;

    let mut instance = wait_for_running(inventory, &created.id, policies.boot, reporter).await?;
    reporter.success(&format!("instance {} booted", instance.id));

    // Single attempt. An untagged instance is invisible to future locate()
    // calls, so a failure here is fatal and the error names the orphan.
    inventory
        .add_tag(&instance.id, "Name", &config.name_tag)
        .await
        .map_err(|e| LifecycleError::Tagging {
            id: instance.id.clone(),
            reason: format!("{e:#}"),
        })?;
    instance.name_tag = config.name_tag.clone();

    anyhow::ensure!(
        instance.has_address(),
        "instance {} is running but has no public address yet; retry 'skiff up'",
        instance.id
    );

    wait_for_reachable(probe, &instance, config.ssh_port, policies.reachability, reporter).await?;
    instance.state = LifecycleState::Reachable;
    reporter.success("SSH is now accessible");

    reporter.step("bootstrapping (this takes a while)...");
    let target = RemoteTarget::for_instance(&instance, config);
    let outcomes = bootstrap::run_plan(remote, &target, plan, reporter).await?;
    instance.state = LifecycleState::Bootstrapped;

    Ok(UpOutcome::Provisioned {
        instance,
        bootstrap: outcomes,
    })
}

/// Terminate the managed instance if one exists.
///
/// # Errors
///
/// Returns an error if `locate` fails or the terminate call is rejected.
pub async fn tear_down(inventory: &impl CloudInventory, name_tag: &str) -> Result<DownOutcome> {
    match locate(inventory, name_tag).await? {
        Some(instance) => {
            inventory
                .terminate(&instance.id)
                .await
                .context("terminating instance")?;
            Ok(DownOutcome::Terminated { id: instance.id })
        }
        None => Ok(DownOutcome::NothingRunning),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
