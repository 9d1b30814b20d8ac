//! Infrastructure loader for the bootstrap plan.
//!
//! Resolution order: explicit `--plan` path, then the `SKIFF_BOOTSTRAP`
//! environment variable, then `~/.skiff/bootstrap.yaml`, then the built-in
//! default plan. Only explicitly named files are required to exist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::BootstrapPlan;

pub const ENV_BOOTSTRAP_PLAN: &str = "SKIFF_BOOTSTRAP";

/// Loads a `BootstrapPlan` from a YAML file on disk.
pub struct YamlPlanStore;

impl YamlPlanStore {
    /// Resolve and load the plan for this invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file (argument or env var)
    /// is missing or fails to parse.
    pub fn load(&self, explicit: Option<&Path>) -> Result<BootstrapPlan> {
        self.load_with(explicit, |key| std::env::var(key).ok())
    }

    fn load_with(
        &self,
        explicit: Option<&Path>,
        get_env: impl Fn(&str) -> Option<String>,
    ) -> Result<BootstrapPlan> {
        if let Some(path) = explicit {
            return load_from(path);
        }
        if let Some(path) = get_env(ENV_BOOTSTRAP_PLAN) {
            return load_from(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.exists() => load_from(&path),
            _ => Ok(BootstrapPlan::default()),
        }
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".skiff").join("bootstrap.yaml"))
}

fn load_from(path: &Path) -> Result<BootstrapPlan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
