//! 归零与运动演示
//!
//! 在模拟控制桥上依次执行：归零 → 关节目标运动 → 笛卡尔增量运动 → 关闭。

use clap::Parser;
use dvrk_sdk::prelude::*;
use dvrk_transport::{SimConfig, SimController};
use std::time::Duration;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "home_and_move")]
#[command(about = "归零与运动演示 - 在模拟控制桥上运行")]
struct Args {
    /// 机械臂名称
    #[arg(long, default_value = "PSM1")]
    arm: String,

    /// 关节数量
    #[arg(long, default_value = "6")]
    joints: usize,

    /// 目标运动耗时（毫秒）
    #[arg(long, default_value = "200")]
    goal_latency_ms: u64,
}

fn main() -> anyhow::Result<()> {
    dvrk_sdk::init_logging();
    let args = Args::parse();

    println!("dVRK SDK - 归零与运动演示");
    println!("========================\n");

    let address = ArmAddress::new(DEFAULT_NAMESPACE, &args.arm);
    let sim_config = SimConfig::default()
        .with_joint_count(args.joints)
        .with_goal(
            dvrk_transport::GoalBehavior::Reach,
            Duration::from_millis(args.goal_latency_ms),
        );
    let (transport, _sim) = SimController::launch(address, sim_config);

    let arm = ArmBuilder::new(&args.arm).require_feedback(true).connect(transport)?;
    println!("已连接 {}（{} 个关节）", arm.address(), args.joints);

    arm.home()?;
    println!("归零完成: {}", arm.robot_state());

    arm.move_joint_one(0.2, 0, MotionMode::Goal)?;
    println!("关节目标: {:?}", arm.observer().joint_position_desired());

    arm.dmove_translation(Vector3::new(0.0, 0.0, -0.05), MotionMode::Goal)?;
    println!("笛卡尔期望: {}", arm.observer().cartesian_desired());

    arm.shutdown()?;
    println!("已关闭: {}", arm.robot_state());

    let metrics = arm.metrics();
    println!(
        "\n通知: {} 已应用 / {} 已丢弃，命令: {}",
        metrics.notifications_applied,
        metrics.notifications_dropped(),
        metrics.commands_sent
    );
    Ok(())
}
