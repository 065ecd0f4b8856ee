//! 模拟控制桥集成测试
//!
//! 直接通过 Publisher/Subscriber 与模拟器交互，不经过驱动层。

use dvrk_messages::{
    ArmAddress, ArmState, Channel, Command, DEFAULT_NAMESPACE, Envelope, JointState, Notification,
    Wrench,
};
use dvrk_transport::{
    GoalBehavior, HomingBehavior, Publisher, SimConfig, SimController, Subscriber, Transport,
};
use std::time::{Duration, Instant};

fn psm1() -> ArmAddress {
    ArmAddress::new(DEFAULT_NAMESPACE, "PSM1")
}

/// 接收通知直到满足条件或超时
fn wait_for<S: Subscriber>(
    subscriber: &mut S,
    timeout: Duration,
    mut predicate: impl FnMut(&Envelope<Notification>) -> bool,
) -> Option<Envelope<Notification>> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(envelope) = subscriber.receive_timeout(Duration::from_millis(10))
            && predicate(&envelope)
        {
            return Some(envelope);
        }
    }
    None
}

#[test]
fn test_initial_state_published() {
    let config = SimConfig::default().with_joint_count(7);
    let (transport, _sim) = SimController::launch(psm1(), config);
    let (_publisher, mut subscriber) = transport.split().unwrap();

    let state = wait_for(&mut subscriber, Duration::from_secs(1), |e| {
        matches!(e.body, Notification::RobotState(_))
    })
    .expect("initial robot_state");
    assert_eq!(state.body, Notification::RobotState(ArmState::Uninitialized));
    assert_eq!(state.seq, None);

    let joints = wait_for(&mut subscriber, Duration::from_secs(1), |e| {
        matches!(e.body, Notification::JointDesired(_))
    })
    .expect("initial joint state");
    match joints.body {
        Notification::JointDesired(state) => assert_eq!(state.len(), 7),
        other => panic!("unexpected notification: {other:?}"),
    }
}

#[test]
fn test_state_request_echoes_sequence() {
    let (transport, sim) = SimController::launch(psm1(), SimConfig::default());
    let (mut publisher, mut subscriber) = transport.split().unwrap();

    publisher
        .publish(
            Envelope::command(&psm1(), Command::SetRobotState(ArmState::PositionJoint)).with_seq(5),
        )
        .unwrap();

    let reply = wait_for(&mut subscriber, Duration::from_secs(1), |e| e.seq == Some(5))
        .expect("tagged state reply");
    assert_eq!(reply.body, Notification::RobotState(ArmState::PositionJoint));
    assert_eq!(reply.topic.channel(), Channel::RobotState);
    assert_eq!(sim.state(), ArmState::PositionJoint);
    assert_eq!(sim.command_count(), 1);
}

#[test]
fn test_homing_reports_intermediate_states() {
    let (transport, sim) = SimController::launch(psm1(), SimConfig::default());
    let (mut publisher, mut subscriber) = transport.split().unwrap();

    publisher
        .publish(Envelope::command(&psm1(), Command::SetRobotState(ArmState::Home)).with_seq(1))
        .unwrap();

    let mut seen = Vec::new();
    let ready = wait_for(&mut subscriber, Duration::from_secs(2), |e| {
        if let Notification::RobotState(state) = &e.body
            && e.seq == Some(1)
        {
            seen.push(state.clone());
            return *state == ArmState::Ready;
        }
        false
    });
    assert!(ready.is_some());
    assert!(seen.len() >= 2, "expected intermediate homing states, got {seen:?}");
    assert!(!seen[0].is_known());
    assert_eq!(sim.state(), ArmState::Ready);
}

#[test]
fn test_stalled_homing_never_ready() {
    let config = SimConfig::default().with_homing(HomingBehavior::Stall);
    let (transport, sim) = SimController::launch(psm1(), config);
    let (mut publisher, mut subscriber) = transport.split().unwrap();

    publisher
        .publish(Envelope::command(&psm1(), Command::SetRobotState(ArmState::Home)))
        .unwrap();

    let ready = wait_for(&mut subscriber, Duration::from_millis(200), |e| {
        e.body == Notification::RobotState(ArmState::Ready)
    });
    assert!(ready.is_none());
    assert_ne!(sim.state(), ArmState::Ready);
}

#[test]
fn test_goal_joint_reached_after_latency() {
    let config = SimConfig::default().with_goal(GoalBehavior::Reach, Duration::from_millis(30));
    let (transport, _sim) = SimController::launch(psm1(), config);
    let (mut publisher, mut subscriber) = transport.split().unwrap();

    let target = vec![0.1, 0.2, 0.3, 0.0, 0.0, 0.0];
    let sent_at = Instant::now();
    publisher
        .publish(Envelope::command(
            &psm1(),
            Command::SetPositionGoalJoint(JointState::from_positions(target.clone())),
        ))
        .unwrap();

    let reached = wait_for(&mut subscriber, Duration::from_secs(1), |e| {
        matches!(e.body, Notification::GoalReached(_))
    })
    .expect("goal_reached");
    assert_eq!(reached.body, Notification::GoalReached(true));
    assert!(sent_at.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_goal_failure_reported() {
    let config = SimConfig::default().with_goal(GoalBehavior::Fail, Duration::from_millis(10));
    let (transport, _sim) = SimController::launch(psm1(), config);
    let (mut publisher, mut subscriber) = transport.split().unwrap();

    publisher
        .publish(Envelope::command(
            &psm1(),
            Command::SetPositionGoalCartesian(Default::default()),
        ))
        .unwrap();

    let reached = wait_for(&mut subscriber, Duration::from_secs(1), |e| {
        matches!(e.body, Notification::GoalReached(_))
    })
    .expect("goal_reached");
    assert_eq!(reached.body, Notification::GoalReached(false));
}

#[test]
fn test_foreign_arm_commands_ignored() {
    let (transport, sim) = SimController::launch(psm1(), SimConfig::default());
    let (mut publisher, _subscriber) = transport.split().unwrap();

    let psm2 = ArmAddress::new(DEFAULT_NAMESPACE, "PSM2");
    publisher
        .publish(Envelope::command(&psm2, Command::SetRobotState(ArmState::Ready)))
        .unwrap();
    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(sim.command_count(), 0);
    assert_eq!(sim.state(), ArmState::Uninitialized);
}

#[test]
fn test_wrench_commands_recorded() {
    let (transport, sim) = SimController::launch(psm1(), SimConfig::default());
    let (mut publisher, _subscriber) = transport.split().unwrap();

    let wrench = Wrench::from_force([0.0, 0.0, 2.0].into());
    publisher
        .publish(Envelope::command(&psm1(), Command::SetWrenchBody(wrench)))
        .unwrap();
    publisher
        .publish(Envelope::command(
            &psm1(),
            Command::SetWrenchBodyOrientationAbsolute(true),
        ))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(1);
    while !sim.wrench_orientation_absolute() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(sim.last_wrench(), Some((Channel::SetWrenchBody, wrench)));
    assert!(sim.wrench_orientation_absolute());
}
