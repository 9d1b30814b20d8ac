//! Infrastructure implementation of the `RemoteExecutor` port.
//!
//! `SshRemote<R>` routes everything through `ssh`/`scp` via a
//! `CommandRunner`. Non-interactive calls run with `BatchMode` so a missing
//! key fails fast instead of hanging on a password prompt; the interactive
//! shell keeps agent forwarding on, matching how operators reach the box.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{RemoteExecutor, RemoteTarget};
use crate::command_runner::{CommandRunner, DEFAULT_REMOTE_TIMEOUT, TokioCommandRunner};

/// Remote-shell adapter driving the system `ssh` and `scp` binaries.
pub struct SshRemote<R: CommandRunner> {
    runner: R,
    identity: Option<PathBuf>,
}

impl SshRemote<TokioCommandRunner> {
    /// Convenience constructor for production use. Picks up
    /// `~/.ssh/<key_name>.pem` when it exists; otherwise the ssh agent is
    /// expected to hold the key.
    #[must_use]
    pub fn default_runner(key_name: &str) -> Self {
        Self::new(
            TokioCommandRunner::new(DEFAULT_REMOTE_TIMEOUT),
            identity_file(key_name),
        )
    }
}

/// Resolve the conventional identity file for a provider keypair name.
#[must_use]
pub fn identity_file(key_name: &str) -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join(format!("{key_name}.pem")))
        .filter(|path| path.exists())
}

impl<R: CommandRunner> SshRemote<R> {
    pub fn new(runner: R, identity: Option<PathBuf>) -> Self {
        Self { runner, identity }
    }

    fn destination(target: &RemoteTarget) -> String {
        format!("{}@{}", target.user, target.host)
    }

    /// Options shared by every invocation. `port_flag` differs between ssh
    /// (`-p`) and scp (`-P`).
    fn common_args(&self, target: &RemoteTarget, port_flag: &str, batch: bool) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            "ConnectTimeout=10".to_string(),
            port_flag.to_string(),
            target.port.to_string(),
        ];
        if batch {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        }
        if let Some(ref identity) = self.identity {
            args.push("-i".to_string());
            args.push(identity.to_string_lossy().into_owned());
        }
        args
    }
}

impl<R: CommandRunner> RemoteExecutor for SshRemote<R> {
    async fn upload(&self, target: &RemoteTarget, local: &str, remote: &str) -> Result<Output> {
        let mut args = self.common_args(target, "-P", true);
        args.push(local.to_string());
        args.push(format!("{}:{remote}", Self::destination(target)));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner.run("scp", &refs).await.context("scp upload")
    }

    async fn run(&self, target: &RemoteTarget, command: &str) -> Result<Output> {
        let mut args = self.common_args(target, "-p", true);
        args.push(Self::destination(target));
        args.push(command.to_string());
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner.run("ssh", &refs).await.context("ssh command")
    }

    async fn open_shell(&self, target: &RemoteTarget) -> Result<std::process::ExitStatus> {
        let mut args = self.common_args(target, "-p", false);
        args.push("-A".to_string());
        args.push(Self::destination(target));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner
            .run_status("ssh", &refs)
            .await
            .context("interactive ssh session")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
