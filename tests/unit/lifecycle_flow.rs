//! Cross-service lifecycle flow tests against the simulated provider.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use skiff_cli::application::services::lifecycle::{self, DownOutcome, UpOutcome};
use skiff_cli::domain::{BootstrapPlan, LifecycleState, PollPolicies, RetryPolicy};

use crate::mocks::{
    NullReporter, RecordingRemote, SIM_ADDRESS, SimulatedCloud, SimulatedProbe, launch_config,
};

fn fast_policies() -> PollPolicies {
    PollPolicies {
        boot: RetryPolicy::new(Duration::ZERO, 10),
        reachability: RetryPolicy::new(Duration::ZERO, 10),
    }
}

#[tokio::test]
async fn end_to_end_up_then_down() {
    let cloud = SimulatedCloud::new(&["pending", "pending", "running"]);
    let probe = SimulatedProbe::new(cloud.clone(), &[false, false, true]);
    let remote = RecordingRemote::default();
    let config = launch_config();
    let plan = BootstrapPlan::default();

    let outcome = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &plan,
        fast_policies(),
    )
    .await
    .expect("up succeeds");

    let UpOutcome::Provisioned {
        instance,
        bootstrap,
    } = outcome
    else {
        panic!("expected a fresh provision on an empty inventory");
    };

    assert_eq!(instance.state, LifecycleState::Bootstrapped);
    assert_eq!(instance.public_address, SIM_ADDRESS);
    assert_eq!(instance.name_tag, config.name_tag);
    assert_eq!(cloud.create_calls.get(), 1);
    assert_eq!(
        *cloud.tag_writes.borrow(),
        vec![(instance.id.clone(), "Name".to_string(), config.name_tag.clone())]
    );

    // three boot polls, then three probes of which the last succeeds
    assert_eq!(probe.calls.get(), 3);
    assert_eq!(
        probe.premature_calls.get(),
        0,
        "reachability must never be probed before the provider reports running"
    );

    // the full default plan ran: one upload, five commands, all successful
    assert_eq!(remote.uploads.borrow().len(), 1);
    assert_eq!(remote.commands.borrow().len(), 5);
    assert!(bootstrap.iter().all(|o| o.success));

    let outcome = lifecycle::tear_down(&*cloud, &config.name_tag)
        .await
        .expect("down succeeds");
    assert!(matches!(outcome, DownOutcome::Terminated { ref id } if *id == instance.id));
    assert_eq!(cloud.terminate_calls.get(), 1);
    assert_eq!(*cloud.terminated_ids.borrow(), vec![instance.id.clone()]);

    assert!(
        lifecycle::locate(&*cloud, &config.name_tag)
            .await
            .expect("locate")
            .is_none(),
        "a terminated instance must disappear from inventory"
    );
}

#[tokio::test]
async fn second_up_reuses_the_instance_without_creating_or_bootstrapping() {
    let cloud = SimulatedCloud::new(&["running"]);
    let probe = SimulatedProbe::new(cloud.clone(), &[true]);
    let remote = RecordingRemote::default();
    let config = launch_config();
    let plan = BootstrapPlan::default();

    let first = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &plan,
        fast_policies(),
    )
    .await
    .expect("first up");
    assert!(matches!(first, UpOutcome::Provisioned { .. }));
    assert_eq!(cloud.create_calls.get(), 1);
    assert_eq!(remote.commands.borrow().len(), 5);

    let second = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &plan,
        fast_policies(),
    )
    .await
    .expect("second up");

    let UpOutcome::AlreadyRunning(instance) = second else {
        panic!("expected the second up to find the existing instance");
    };
    assert_eq!(instance.public_address, SIM_ADDRESS);
    assert_eq!(cloud.create_calls.get(), 1, "exactly one create overall");
    assert_eq!(
        remote.commands.borrow().len(),
        5,
        "no re-bootstrap on the second up"
    );
}

#[tokio::test]
async fn up_against_a_seeded_instance_contacts_nothing_remote() {
    let cloud = SimulatedCloud::new(&[]);
    cloud.seed_running("i-0seed", "skiff-gpu");
    let probe = SimulatedProbe::new(cloud.clone(), &[]);
    let remote = RecordingRemote::default();
    let config = launch_config();

    let outcome = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &BootstrapPlan::default(),
        fast_policies(),
    )
    .await
    .expect("up");

    assert!(matches!(outcome, UpOutcome::AlreadyRunning(ref i) if i.id == "i-0seed"));
    assert_eq!(cloud.create_calls.get(), 0);
    assert_eq!(probe.calls.get(), 0);
    assert!(remote.uploads.borrow().is_empty());
    assert!(remote.commands.borrow().is_empty());
}

#[tokio::test]
async fn boot_timeout_leaves_reachability_unprobed() {
    let cloud = SimulatedCloud::new(&["pending", "pending", "pending", "pending"]);
    let probe = SimulatedProbe::new(cloud.clone(), &[true]);
    let remote = RecordingRemote::default();
    let config = launch_config();

    let err = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &BootstrapPlan::default(),
        PollPolicies {
            boot: RetryPolicy::new(Duration::ZERO, 3),
            reachability: RetryPolicy::new(Duration::ZERO, 3),
        },
    )
    .await
    .expect_err("expected a boot timeout");

    assert!(err.to_string().contains("did not reach"), "got: {err}");
    assert_eq!(probe.calls.get(), 0, "no probe while the provider reports pending");
    assert!(remote.commands.borrow().is_empty());
}

#[tokio::test]
async fn two_tagged_instances_fail_up_without_mutations() {
    let cloud = SimulatedCloud::new(&[]);
    cloud.seed_running("i-0one", "skiff-gpu");
    cloud.seed_running("i-0two", "skiff-gpu");
    let probe = SimulatedProbe::new(cloud.clone(), &[]);
    let remote = RecordingRemote::default();
    let config = launch_config();

    let err = lifecycle::ensure_up(
        &*cloud,
        &probe,
        &remote,
        &NullReporter,
        &config,
        &BootstrapPlan::default(),
        fast_policies(),
    )
    .await
    .expect_err("expected the multiplicity guard to fire");

    assert!(err.to_string().contains("exactly one"), "got: {err}");
    assert_eq!(cloud.create_calls.get(), 0);
    assert_eq!(cloud.terminate_calls.get(), 0);
    assert_eq!(probe.calls.get(), 0);
}
