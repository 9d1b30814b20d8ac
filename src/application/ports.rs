//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.
//!
//! Every remote operation takes an explicit target value; no port keeps an
//! ambient "current host" between calls.

use std::process::Output;

use anyhow::Result;

use crate::domain::{LaunchConfig, ManagedInstance};

// ── Value Types ───────────────────────────────────────────────────────────────

/// The remote endpoint a shell or file-transfer operation is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub host: String,
    pub user: String,
    pub port: u16,
}

impl RemoteTarget {
    /// Target the given instance's public address as the configured user.
    #[must_use]
    pub fn for_instance(instance: &ManagedInstance, config: &LaunchConfig) -> Self {
        Self {
            host: instance.public_address.clone(),
            user: config.ssh_user.clone(),
            port: config.ssh_port,
        }
    }
}

// ── Cloud Inventory Port ──────────────────────────────────────────────────────

/// The provider's authoritative instance inventory.
///
/// `list_by_tag` must restrict itself to non-terminated instances — the
/// controller treats provider-side filtering as part of the contract.
#[allow(async_fn_in_trait)]
pub trait CloudInventory {
    /// List non-terminated instances carrying the given discovery tag.
    async fn list_by_tag(&self, name_tag: &str) -> Result<Vec<ManagedInstance>>;

    /// Launch one instance with the configured image, type, and keypair.
    async fn create(&self, config: &LaunchConfig) -> Result<ManagedInstance>;

    /// Fetch the current provider view of one instance by id.
    async fn describe(&self, id: &str) -> Result<ManagedInstance>;

    /// Write a tag on an existing instance.
    async fn add_tag(&self, id: &str, key: &str, value: &str) -> Result<()>;

    /// Terminate an instance by id.
    async fn terminate(&self, id: &str) -> Result<()>;
}

// ── Reachability Port ─────────────────────────────────────────────────────────

/// TCP-connect probe used to decide when a freshly booted instance's
/// remote-shell service is ready to accept sessions.
#[allow(async_fn_in_trait)]
pub trait ReachabilityProbe {
    /// Attempt one TCP connection; `Ok(false)` means "not reachable yet".
    async fn probe_tcp(&self, host: &str, port: u16) -> Result<bool>;
}

// ── Remote Executor Port ──────────────────────────────────────────────────────

/// Shell and file-transfer access to a booted instance.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Copy a local file to a path in the remote home directory.
    async fn upload(&self, target: &RemoteTarget, local: &str, remote: &str) -> Result<Output>;

    /// Run one shell command on the target and capture output.
    async fn run(&self, target: &RemoteTarget, command: &str) -> Result<Output>;

    /// Open an interactive shell session with agent forwarding and block
    /// until it ends. This is a foreground hand-off, not a managed child.
    async fn open_shell(&self, target: &RemoteTarget) -> Result<std::process::ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
