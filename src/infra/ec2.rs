//! Infrastructure implementation of the `CloudInventory` port.
//!
//! `Ec2Inventory<R>` routes every provider call through the `aws` CLI via a
//! `CommandRunner`, so tests can inject a runner that returns canned JSON
//! without spawning processes. Responses are parsed leniently: only the
//! instance id is mandatory, everything else degrades to empty/pending.

use std::process::Output;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::application::ports::CloudInventory;
use crate::command_runner::{CommandRunner, DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::domain::{LaunchConfig, LifecycleState, ManagedInstance};

/// Minimum supported AWS CLI release (v1 prints its version to stderr and
/// predates several `--filters` behaviors this adapter relies on).
const AWS_CLI_MIN_VERSION: semver::Version = semver::Version::new(2, 0, 0);

/// Cloud inventory adapter driving the `aws ec2` command family.
pub struct Ec2Inventory<R: CommandRunner> {
    runner: R,
    region: String,
}

impl Ec2Inventory<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(region: &str) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), region)
    }
}

impl<R: CommandRunner> Ec2Inventory<R> {
    pub fn new(runner: R, region: &str) -> Self {
        Self {
            runner,
            region: region.to_string(),
        }
    }

    async fn ec2(&self, args: &[&str]) -> Result<Output> {
        let mut full = vec!["ec2"];
        full.extend_from_slice(args);
        full.extend_from_slice(&["--region", &self.region, "--output", "json"]);
        let output = self
            .runner
            .run("aws", &full)
            .await
            .with_context(|| format!("aws ec2 {}", args.first().copied().unwrap_or("")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "aws ec2 {} failed: {}",
                args.first().copied().unwrap_or(""),
                stderr.trim()
            );
        }
        Ok(output)
    }
}

impl<R: CommandRunner> CloudInventory for Ec2Inventory<R> {
    async fn list_by_tag(&self, name_tag: &str) -> Result<Vec<ManagedInstance>> {
        let tag_filter = format!("Name=tag:Name,Values={name_tag}");
        let output = self
            .ec2(&[
                "describe-instances",
                "--filters",
                &tag_filter,
                "Name=instance-state-name,Values=pending,running",
            ])
            .await?;
        parse_reservations(&output.stdout, &self.region)
    }

    async fn create(&self, config: &LaunchConfig) -> Result<ManagedInstance> {
        let output = self
            .ec2(&[
                "run-instances",
                "--image-id",
                &config.image_id,
                "--instance-type",
                &config.instance_type,
                "--key-name",
                &config.key_name,
                "--count",
                "1",
            ])
            .await?;
        let body: Value =
            serde_json::from_slice(&output.stdout).context("parsing run-instances response")?;
        let first = body
            .get("Instances")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .context("run-instances response contained no instance")?;
        parse_instance(first, &self.region)
    }

    async fn describe(&self, id: &str) -> Result<ManagedInstance> {
        let output = self
            .ec2(&["describe-instances", "--instance-ids", id])
            .await?;
        parse_reservations(&output.stdout, &self.region)?
            .into_iter()
            .next()
            .with_context(|| format!("instance {id} not found in inventory"))
    }

    async fn add_tag(&self, id: &str, key: &str, value: &str) -> Result<()> {
        let tag = format!("Key={key},Value={value}");
        self.ec2(&["create-tags", "--resources", id, "--tags", &tag])
            .await?;
        Ok(())
    }

    async fn terminate(&self, id: &str) -> Result<()> {
        self.ec2(&["terminate-instances", "--instance-ids", id])
            .await?;
        Ok(())
    }
}

// ── Response parsing ──────────────────────────────────────────────────────────

fn parse_reservations(body: &[u8], region: &str) -> Result<Vec<ManagedInstance>> {
    let value: Value =
        serde_json::from_slice(body).context("parsing describe-instances response")?;
    let mut instances = Vec::new();
    for reservation in value
        .get("Reservations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        for entry in reservation
            .get("Instances")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            instances.push(parse_instance(entry, region)?);
        }
    }
    Ok(instances)
}

fn parse_instance(entry: &Value, region: &str) -> Result<ManagedInstance> {
    let id = entry
        .get("InstanceId")
        .and_then(Value::as_str)
        .context("instance entry has no InstanceId")?;
    let state = entry
        .pointer("/State/Name")
        .and_then(Value::as_str)
        .unwrap_or("pending");
    let public_address = entry
        .get("PublicDnsName")
        .and_then(Value::as_str)
        .filter(|addr| !addr.is_empty())
        .or_else(|| entry.get("PublicIpAddress").and_then(Value::as_str))
        .unwrap_or("");
    let name_tag = entry
        .get("Tags")
        .and_then(Value::as_array)
        .and_then(|tags| {
            tags.iter()
                .find(|tag| tag.get("Key").and_then(Value::as_str) == Some("Name"))
        })
        .and_then(|tag| tag.get("Value").and_then(Value::as_str))
        .unwrap_or("");

    Ok(ManagedInstance {
        id: id.to_string(),
        name_tag: name_tag.to_string(),
        public_address: public_address.to_string(),
        state: LifecycleState::from_provider(state),
        region: region.to_string(),
        image_id: str_field(entry, "ImageId"),
        instance_type: str_field(entry, "InstanceType"),
        key_name: str_field(entry, "KeyName"),
    })
}

fn str_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ── Preflight ─────────────────────────────────────────────────────────────────

/// Verify the `aws` CLI exists and is recent enough.
///
/// # Errors
///
/// Returns an error if the binary is missing or reports a version below the
/// supported minimum.
pub async fn check_aws_cli(runner: &impl CommandRunner) -> Result<()> {
    let output = runner.run("aws", &["--version"]).await.map_err(|_| {
        anyhow::anyhow!("AWS CLI not available. Install awscli v2 and configure credentials.")
    })?;
    // v2 prints to stdout, v1 printed to stderr
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let pattern = regex::Regex::new(r"aws-cli/(\d+\.\d+\.\d+)").context("version pattern")?;
    if let Some(captures) = pattern.captures(&text)
        && let Ok(version) = semver::Version::parse(&captures[1])
        && version < AWS_CLI_MIN_VERSION
    {
        anyhow::bail!(
            "AWS CLI {version} is too old; skiff needs {AWS_CLI_MIN_VERSION} or newer."
        );
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
