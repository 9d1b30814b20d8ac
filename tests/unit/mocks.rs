//! Simulated collaborators for lifecycle flow tests.
//!
//! `SimulatedCloud` models the provider's inventory across calls: created
//! instances are invisible to `list_by_tag` until tagged, `describe`
//! replays a scripted boot-state sequence, and `terminate` removes the
//! instance from inventory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{Context, Result};

use skiff_cli::application::ports::{
    CloudInventory, ProgressReporter, ReachabilityProbe, RemoteExecutor, RemoteTarget,
};
use skiff_cli::domain::{LaunchConfig, LifecycleState, ManagedInstance};

pub const SIM_ADDRESS: &str = "ec2-198-51-100-7.sim.example";

pub struct SimulatedCloud {
    pub instances: RefCell<Vec<ManagedInstance>>,
    /// Provider states returned by successive `describe` calls; once the
    /// script runs out, the instance stays `running`.
    pub boot_states: RefCell<VecDeque<&'static str>>,
    /// Last provider state any call observed, for ordering assertions.
    pub current_state: Cell<LifecycleState>,
    pub create_calls: Cell<u32>,
    pub terminate_calls: Cell<u32>,
    pub terminated_ids: RefCell<Vec<String>>,
    pub tag_writes: RefCell<Vec<(String, String, String)>>,
}

impl SimulatedCloud {
    pub fn new(boot_states: &[&'static str]) -> Rc<Self> {
        Rc::new(Self {
            instances: RefCell::new(Vec::new()),
            boot_states: RefCell::new(boot_states.iter().copied().collect()),
            current_state: Cell::new(LifecycleState::Pending),
            create_calls: Cell::new(0),
            terminate_calls: Cell::new(0),
            terminated_ids: RefCell::new(Vec::new()),
            tag_writes: RefCell::new(Vec::new()),
        })
    }

    /// Seed the inventory with an already-tagged running instance.
    pub fn seed_running(&self, id: &str, name_tag: &str) {
        self.instances.borrow_mut().push(ManagedInstance {
            id: id.to_string(),
            name_tag: name_tag.to_string(),
            public_address: SIM_ADDRESS.to_string(),
            state: LifecycleState::Running,
            region: "us-west-1".to_string(),
            image_id: "ami-91b077d5".to_string(),
            instance_type: "g2.2xlarge".to_string(),
            key_name: "dev-key".to_string(),
        });
        self.current_state.set(LifecycleState::Running);
    }
}

impl CloudInventory for SimulatedCloud {
    async fn list_by_tag(&self, name_tag: &str) -> Result<Vec<ManagedInstance>> {
        Ok(self
            .instances
            .borrow()
            .iter()
            .filter(|i| i.name_tag == name_tag && i.state != LifecycleState::Terminated)
            .cloned()
            .collect())
    }

    async fn create(&self, config: &LaunchConfig) -> Result<ManagedInstance> {
        self.create_calls.set(self.create_calls.get() + 1);
        let instance = ManagedInstance {
            id: format!("i-sim{:04}", self.create_calls.get()),
            // untagged until add_tag — invisible to list_by_tag
            name_tag: String::new(),
            public_address: String::new(),
            state: LifecycleState::Pending,
            region: config.region.clone(),
            image_id: config.image_id.clone(),
            instance_type: config.instance_type.clone(),
            key_name: config.key_name.clone(),
        };
        self.instances.borrow_mut().push(instance.clone());
        self.current_state.set(LifecycleState::Pending);
        Ok(instance)
    }

    async fn describe(&self, id: &str) -> Result<ManagedInstance> {
        let provider_state = self.boot_states.borrow_mut().pop_front().unwrap_or("running");
        let state = LifecycleState::from_provider(provider_state);
        let mut instances = self.instances.borrow_mut();
        let instance = instances
            .iter_mut()
            .find(|i| i.id == id)
            .with_context(|| format!("unknown instance {id}"))?;
        instance.state = state;
        if state.is_running() && instance.public_address.is_empty() {
            instance.public_address = SIM_ADDRESS.to_string();
        }
        self.current_state.set(state);
        Ok(instance.clone())
    }

    async fn add_tag(&self, id: &str, key: &str, value: &str) -> Result<()> {
        let mut instances = self.instances.borrow_mut();
        let instance = instances
            .iter_mut()
            .find(|i| i.id == id)
            .with_context(|| format!("unknown instance {id}"))?;
        if key == "Name" {
            instance.name_tag = value.to_string();
        }
        self.tag_writes
            .borrow_mut()
            .push((id.to_string(), key.to_string(), value.to_string()));
        Ok(())
    }

    async fn terminate(&self, id: &str) -> Result<()> {
        self.terminate_calls.set(self.terminate_calls.get() + 1);
        self.terminated_ids.borrow_mut().push(id.to_string());
        self.instances.borrow_mut().retain(|i| i.id != id);
        Ok(())
    }
}

/// Probe replaying a scripted answer sequence, flagging any call made while
/// the simulated provider had not yet reported `running`.
pub struct SimulatedProbe {
    cloud: Rc<SimulatedCloud>,
    answers: RefCell<VecDeque<bool>>,
    pub calls: Cell<u32>,
    pub premature_calls: Cell<u32>,
}

impl SimulatedProbe {
    pub fn new(cloud: Rc<SimulatedCloud>, answers: &[bool]) -> Self {
        Self {
            cloud,
            answers: RefCell::new(answers.iter().copied().collect()),
            calls: Cell::new(0),
            premature_calls: Cell::new(0),
        }
    }
}

impl ReachabilityProbe for SimulatedProbe {
    async fn probe_tcp(&self, _: &str, _: u16) -> Result<bool> {
        self.calls.set(self.calls.get() + 1);
        if !self.cloud.current_state.get().is_running() {
            self.premature_calls.set(self.premature_calls.get() + 1);
        }
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// Remote executor recording uploads and commands; never fails.
#[derive(Default)]
pub struct RecordingRemote {
    pub uploads: RefCell<Vec<(String, String)>>,
    pub commands: RefCell<Vec<String>>,
}

impl RemoteExecutor for RecordingRemote {
    async fn upload(&self, _: &RemoteTarget, local: &str, remote: &str) -> Result<std::process::Output> {
        self.uploads
            .borrow_mut()
            .push((local.to_string(), remote.to_string()));
        Ok(ok_output())
    }

    async fn run(&self, _: &RemoteTarget, command: &str) -> Result<std::process::Output> {
        self.commands.borrow_mut().push(command.to_string());
        Ok(ok_output())
    }

    async fn open_shell(&self, _: &RemoteTarget) -> Result<std::process::ExitStatus> {
        anyhow::bail!("not expected")
    }
}

pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

#[cfg(unix)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

fn ok_output() -> std::process::Output {
    std::process::Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Launch configuration matching the simulated provider fixtures.
pub fn launch_config() -> LaunchConfig {
    LaunchConfig::from_lookup(|key| (key == "SKIFF_KEY_NAME").then(|| "dev-key".to_string()))
        .expect("fixture config")
}
