//! 增量运动命令
//!
//! 关节增量以期望关节位置为基础；笛卡尔平移增量以期望位姿为基础。

use super::motion_mode;
use super::r#move::print_joints;
use crate::validation::{parse_indices, parse_translation, parse_values};
use anyhow::Result;
use clap::Args;
use dvrk_sdk::Arm;

/// 增量运动命令参数
#[derive(Args, Debug)]
pub struct DmoveCommand {
    /// 关节增量，逗号分隔
    #[arg(short, long, conflicts_with = "translation", required_unless_present = "translation")]
    pub joints: Option<String>,

    /// 只移动这些关节（从 0 开始，逗号分隔）
    #[arg(short, long, requires = "joints")]
    pub indices: Option<String>,

    /// 笛卡尔平移增量 x,y,z（米）
    #[arg(short, long)]
    pub translation: Option<String>,

    /// 直接模式（不等待到达）
    #[arg(long)]
    pub direct: bool,
}

impl DmoveCommand {
    pub fn execute(&self, arm: &Arm) -> Result<()> {
        let mode = motion_mode(self.direct);

        if let Some(translation) = &self.translation {
            let delta = parse_translation(translation)?;
            println!("⏳ 笛卡尔增量 {:?} ({:?})...", delta, mode);
            arm.dmove(delta, mode)?;
            println!("  期望位姿: {}", arm.observer().cartesian_desired());
        } else if let Some(joints) = &self.joints {
            let deltas = parse_values(joints, "关节增量")?;
            println!("⏳ 关节增量 ({:?})...", mode);
            match &self.indices {
                Some(indices) => arm.dmove_joint_some(&deltas, &parse_indices(indices)?, mode)?,
                None => arm.dmove_joint(&deltas, mode)?,
            }
            print_joints(&arm.observer().joint_position_desired());
        } else {
            anyhow::bail!("需要 --joints 或 --translation");
        }

        println!("✅ 移动完成");
        Ok(())
    }
}
