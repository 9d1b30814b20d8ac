//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. Messages are written for the
//! operator: they name the resource at fault and say what to do next.

use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Fatal conditions raised by the instance lifecycle controller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(
        "Found {count} instances tagged '{tag}'. Skiff manages exactly one; \
         terminate the extras in the provider console before retrying."
    )]
    MultipleInstances { tag: String, count: usize },

    #[error("Provider rejected instance creation: {reason}")]
    Provisioning { reason: String },

    #[error(
        "Instance {id} did not reach 'running' after {attempts} polls. \
         Inspect it in the provider console, then retry 'skiff up'."
    )]
    BootTimeout { id: String, attempts: u32 },

    #[error(
        "Instance {id} at {address} never accepted connections on port {port} \
         after {attempts} probes. Check the image and security group rules."
    )]
    Unreachable {
        id: String,
        address: String,
        port: u16,
        attempts: u32,
    },

    #[error(
        "Failed to tag instance {id}: {reason}. The instance is running but \
         undiscoverable by skiff — terminate it manually to avoid charges."
    )]
    Tagging { id: String, reason: String },

    #[error("Bootstrap failed: none of the {total} commands succeeded on {address}.")]
    BootstrapFailed { address: String, total: usize },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while reading the environment configuration surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {key}")]
    MissingKey { key: String },

    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
