//! 多机械臂测试
//!
//! 每个机械臂拥有独立的会话，可在不同线程中并发运动。

use dvrk_sdk::prelude::*;
use dvrk_transport::{GoalBehavior, SimConfig, SimController};
use std::thread;
use std::time::Duration;

fn fast_config() -> ArmConfig {
    ArmConfig {
        state_timeout_ms: 500,
        goal_timeout_ms: 500,
        home_attempt_timeout_ms: 100,
        receive_timeout_ms: 2,
        ..ArmConfig::default()
    }
}

fn launch(name: &str, joints: usize) -> (Arm, SimController) {
    let address = ArmAddress::new(DEFAULT_NAMESPACE, name);
    let sim_config = SimConfig::default()
        .with_joint_count(joints)
        .with_goal(GoalBehavior::Reach, Duration::from_millis(20));
    let (transport, sim) = SimController::launch(address, sim_config);
    let arm = ArmBuilder::new(name)
        .config(fast_config())
        .require_feedback(true)
        .connect(transport)
        .unwrap();
    (arm, sim)
}

#[test]
fn test_arms_move_concurrently() {
    let (psm, _psm_sim) = launch("PSM1", 6);
    let (mtm, _mtm_sim) = launch("MTMR", 7);

    let psm_thread = thread::spawn(move || {
        psm.home()?;
        psm.move_joint_one(0.5, 5, MotionMode::Goal)?;
        Ok::<_, ArmError>(psm.observer().joint_position_desired())
    });
    let mtm_thread = thread::spawn(move || {
        mtm.home()?;
        mtm.dmove_joint_some(&[0.1, -0.1], &[0, 6], MotionMode::Goal)?;
        Ok::<_, ArmError>(mtm.observer().joint_position_desired())
    });

    let psm_desired = psm_thread.join().unwrap().unwrap();
    let mtm_desired = mtm_thread.join().unwrap().unwrap();
    assert_eq!(psm_desired, vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);
    assert_eq!(mtm_desired, vec![0.1, 0.0, 0.0, 0.0, 0.0, 0.0, -0.1]);
}

#[test]
fn test_arm_ignores_other_arm_traffic() {
    let (psm, psm_sim) = launch("PSM1", 6);
    // 另一个机械臂的通知发到同一总线上
    let other = ArmAddress::new(DEFAULT_NAMESPACE, "PSM2");
    psm_sim
        .notifier()
        .notify_arm(
            &other,
            dvrk_sdk::messages::Notification::RobotState(ArmState::Ready),
            None,
        )
        .unwrap();

    thread::sleep(Duration::from_millis(30));
    assert_eq!(psm.robot_state(), ArmState::Uninitialized);
    assert!(psm.metrics().notifications_foreign >= 1);
}
