//! Domain types and validators for skiff configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access. The launch
//! surface is environment-sourced; `from_lookup` takes the lookup closure so
//! tests never touch process env.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Environment keys ─────────────────────────────────────────────────────────

pub const ENV_KEY_NAME: &str = "SKIFF_KEY_NAME";
pub const ENV_REGION: &str = "SKIFF_REGION";
pub const ENV_IMAGE_ID: &str = "SKIFF_IMAGE_ID";
pub const ENV_INSTANCE_TYPE: &str = "SKIFF_INSTANCE_TYPE";
pub const ENV_INSTANCE_NAME: &str = "SKIFF_INSTANCE_NAME";
pub const ENV_SSH_USER: &str = "SKIFF_SSH_USER";
pub const ENV_SSH_PORT: &str = "SKIFF_SSH_PORT";

pub const DEFAULT_REGION: &str = "us-west-1";
pub const DEFAULT_IMAGE_ID: &str = "ami-91b077d5";
pub const DEFAULT_INSTANCE_TYPE: &str = "g2.2xlarge";
pub const DEFAULT_INSTANCE_NAME: &str = "skiff-gpu";
pub const DEFAULT_SSH_USER: &str = "ubuntu";
pub const DEFAULT_SSH_PORT: u16 = 22;

// ── Launch configuration ─────────────────────────────────────────────────────

/// Everything needed to launch, find, and reach the managed instance.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Provider keypair to launch with; also names the local identity file.
    pub key_name: String,
    pub region: String,
    pub image_id: String,
    pub instance_type: String,
    /// Discovery tag written after launch and filtered on by `locate`.
    pub name_tag: String,
    pub ssh_user: String,
    /// Admin port probed for reachability and used for shell sessions.
    pub ssh_port: u16,
}

impl LaunchConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SKIFF_KEY_NAME` is unset or `SKIFF_SSH_PORT`
    /// is not a valid port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Same contract as [`LaunchConfig::from_env`].
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key_name = get(ENV_KEY_NAME).filter(|v| !v.is_empty()).ok_or_else(|| {
            ConfigError::MissingKey {
                key: ENV_KEY_NAME.to_string(),
            }
        })?;

        let ssh_port = match get(ENV_SSH_PORT) {
            None => DEFAULT_SSH_PORT,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SSH_PORT.to_string(),
                value: raw.clone(),
                reason: "expected a port number between 1 and 65535".to_string(),
            })?,
        };

        Ok(Self {
            key_name,
            region: get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            image_id: get(ENV_IMAGE_ID).unwrap_or_else(|| DEFAULT_IMAGE_ID.to_string()),
            instance_type: get(ENV_INSTANCE_TYPE)
                .unwrap_or_else(|| DEFAULT_INSTANCE_TYPE.to_string()),
            name_tag: get(ENV_INSTANCE_NAME).unwrap_or_else(|| DEFAULT_INSTANCE_NAME.to_string()),
            ssh_user: get(ENV_SSH_USER).unwrap_or_else(|| DEFAULT_SSH_USER.to_string()),
            ssh_port,
        })
    }
}

// ── Polling policy ───────────────────────────────────────────────────────────

/// Bounded fixed-interval retry policy for a single wait loop.
///
/// Fixed interval, no backoff, no jitter — each loop targets one private
/// provisioning action, not a shared service.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// The two wait loops of `ensure_up`, in the order they run.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicies {
    /// Provider boot-state poll (pending → running).
    pub boot: RetryPolicy,
    /// TCP reachability poll on the admin port.
    pub reachability: RetryPolicy,
}

impl Default for PollPolicies {
    fn default() -> Self {
        let ten_seconds = Duration::from_secs(10);
        Self {
            boot: RetryPolicy::new(ten_seconds, 60),
            reachability: RetryPolicy::new(ten_seconds, 60),
        }
    }
}

// ── Bootstrap plan ───────────────────────────────────────────────────────────

const DEFAULT_PROJECT_REPO: &str = "git@github.com:newsdev/deeplearn-test.git";

/// One local file copied into the remote home before commands run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileUpload {
    pub local: String,
    pub remote: String,
}

/// The one-time bootstrap procedure: a file upload followed by an ordered
/// command sequence. Loaded from `~/.skiff/bootstrap.yaml` when present,
/// otherwise the default GPU dev-box setup below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapPlan {
    pub upload: FileUpload,
    pub commands: Vec<String>,
}

impl Default for BootstrapPlan {
    fn default() -> Self {
        Self {
            upload: FileUpload {
                local: "./dotfiles/.bashrc".to_string(),
                remote: ".bashrc".to_string(),
            },
            commands: vec![
                format!("git clone {DEFAULT_PROJECT_REPO}"),
                "sudo apt-get update".to_string(),
                "sudo apt-get install -y python-dev python-setuptools pkg-config liblapack-dev"
                    .to_string(),
                "sudo easy_install pip".to_string(),
                "sudo -H pip install -r ~/deeplearn-test/requirements.txt".to_string(),
            ],
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
