//! The managed instance entity and its observed lifecycle state.
//!
//! Skiff never persists a `ManagedInstance` — it is reconstructed on every
//! invocation from a fresh inventory query. The provider's tag store is the
//! only source of truth.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a managed instance as observed by the controller.
///
/// `Pending` and `Running` come straight from the provider; `Reachable` and
/// `Bootstrapped` are controller-level refinements of `Running` reached
/// during `ensure_up`. `Terminated` covers every provider state on the way
/// out (`shutting-down`, `stopping`, `stopped`, `terminated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    Pending,
    Running,
    Reachable,
    Bootstrapped,
    Terminated,
}

impl LifecycleState {
    /// Map a provider-reported state string onto the controller's view.
    ///
    /// Unknown strings map to `Pending`: treating an unrecognised state as
    /// not-yet-running keeps the boot poll waiting instead of acting on a
    /// state we cannot interpret.
    #[must_use]
    pub fn from_provider(state: &str) -> Self {
        match state {
            "running" => Self::Running,
            "shutting-down" | "stopping" | "stopped" | "terminated" => Self::Terminated,
            _ => Self::Pending,
        }
    }

    /// True once the provider reports the instance booted.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running | Self::Reachable | Self::Bootstrapped)
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Reachable => "reachable",
            Self::Bootstrapped => "bootstrapped",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// The single remote compute resource skiff creates, tracks, and destroys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedInstance {
    /// Provider-assigned opaque identifier.
    pub id: String,
    /// Operator-chosen label used as the discovery key.
    pub name_tag: String,
    /// Public hostname or IP; empty until the provider assigns one.
    pub public_address: String,
    pub state: LifecycleState,
    pub region: String,
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
}

impl ManagedInstance {
    /// True when the provider has assigned a public address.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.public_address.is_empty()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
