//! 命令定义和实现

pub mod dmove;
pub mod monitor;
pub mod r#move;
pub mod state;

pub use dmove::DmoveCommand;
pub use monitor::MonitorCommand;
pub use r#move::MoveCommand;
pub use state::StateCommand;

use anyhow::Result;
use dvrk_sdk::{Arm, MotionMode};

/// `--direct` 开关对应的运动模式
pub fn motion_mode(direct: bool) -> MotionMode {
    if direct {
        MotionMode::Direct
    } else {
        MotionMode::Goal
    }
}

/// 归零
pub fn home(arm: &Arm) -> Result<()> {
    println!("⏳ 正在归零...");
    arm.home()?;
    println!("✅ 归零完成（状态: {}）", arm.robot_state());
    Ok(())
}

/// 关闭
pub fn shutdown(arm: &Arm) -> Result<()> {
    println!("⏳ 正在关闭...");
    arm.shutdown()?;
    println!("✅ 已关闭（状态: {}）", arm.robot_state());
    Ok(())
}
