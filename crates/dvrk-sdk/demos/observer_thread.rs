//! 观察器线程演示
//!
//! 前台线程执行目标运动，后台线程通过克隆的 `Observer` 读取关节状态，
//! Ctrl-C 停止。

use dvrk_sdk::prelude::*;
use dvrk_transport::{SimConfig, SimController};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    dvrk_sdk::init_logging();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let address = ArmAddress::new(DEFAULT_NAMESPACE, "MTML");
    let sim_config = SimConfig::default()
        .with_joint_count(7)
        .with_initial_state(ArmState::Ready);
    let (transport, _sim) = SimController::launch(address, sim_config);
    let arm = ArmBuilder::new("MTML").require_feedback(true).connect(transport)?;

    let observer = arm.observer().clone();
    let monitor_running = running.clone();
    let monitor = thread::spawn(move || {
        while monitor_running.load(Ordering::SeqCst) {
            println!(
                "[{}] q = {:?}",
                observer.robot_state(),
                observer.joint_position_current()
            );
            thread::sleep(Duration::from_millis(100));
        }
    });

    let mut sign = 1.0;
    while running.load(Ordering::SeqCst) {
        arm.dmove_joint_one(sign * 0.1, 3, MotionMode::Goal)?;
        sign = -sign;
    }

    monitor
        .join()
        .map_err(|_| anyhow::anyhow!("monitor thread panicked"))?;
    arm.shutdown()?;
    Ok(())
}
