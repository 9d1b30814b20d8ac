//! Shared test helpers for lifecycle service tests.

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// A `ProgressReporter` that swallows everything.
pub struct ReporterStub;

impl crate::application::ports::ProgressReporter for ReporterStub {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// A `ManagedInstance` fixture in the given state.
pub fn instance(id: &str, state: crate::domain::LifecycleState) -> crate::domain::ManagedInstance {
    crate::domain::ManagedInstance {
        id: id.to_string(),
        name_tag: "skiff-gpu".to_string(),
        public_address: "ec2-198-51-100-7.test.example".to_string(),
        state,
        region: "us-west-1".to_string(),
        image_id: "ami-91b077d5".to_string(),
        instance_type: "g2.2xlarge".to_string(),
        key_name: "dev-key".to_string(),
    }
}

/// A `LaunchConfig` fixture matching [`instance`].
pub fn launch_config() -> crate::domain::LaunchConfig {
    crate::domain::LaunchConfig::from_lookup(|key| {
        (key == crate::domain::config::ENV_KEY_NAME).then(|| "dev-key".to_string())
    })
    .expect("fixture config")
}
