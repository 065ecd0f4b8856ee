//! 状态查询命令

use anyhow::Result;
use clap::{Args, ValueEnum};
use dvrk_sdk::{Arm, Observer, Pose};
use serde::Serialize;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 状态查询命令参数
#[derive(Args, Debug)]
pub struct StateCommand {
    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// 位姿（位置 + 四元数 xyzw）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseView {
    pub position: [f64; 3],
    pub quaternion: [f64; 4],
}

impl From<Pose> for PoseView {
    fn from(pose: Pose) -> Self {
        let (position, quaternion) = pose.to_position_quaternion();
        Self {
            position,
            quaternion,
        }
    }
}

/// 机械臂状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmSnapshot {
    pub arm: String,
    pub state: String,
    pub goal_reached: bool,
    pub joint_count: Option<usize>,
    pub joint_position_current: Vec<f64>,
    pub joint_velocity_current: Vec<f64>,
    pub joint_effort_current: Vec<f64>,
    pub joint_position_desired: Vec<f64>,
    pub joint_effort_desired: Vec<f64>,
    pub cartesian_current: PoseView,
    pub cartesian_desired: PoseView,
}

impl ArmSnapshot {
    pub fn capture(arm: &str, observer: &Observer) -> Self {
        Self {
            arm: arm.to_string(),
            state: observer.robot_state().to_string(),
            goal_reached: observer.goal_reached(),
            joint_count: observer.joint_count(),
            joint_position_current: observer.joint_position_current(),
            joint_velocity_current: observer.joint_velocity_current(),
            joint_effort_current: observer.joint_effort_current(),
            joint_position_desired: observer.joint_position_desired(),
            joint_effort_desired: observer.joint_effort_desired(),
            cartesian_current: observer.cartesian_current().into(),
            cartesian_desired: observer.cartesian_desired().into(),
        }
    }

    pub fn print_table(&self) {
        println!("📊 {} [{}]", self.arm, self.state);
        println!("  goal reached: {}", self.goal_reached);
        println!("  {:<4} {:>10} {:>10} {:>10} {:>10}", "", "q", "dq", "effort", "q_desired");
        for (i, q) in self.joint_position_current.iter().enumerate() {
            let column = |values: &[f64]| {
                values
                    .get(i)
                    .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
            };
            println!(
                "  J{:<3} {:>10.4} {:>10} {:>10} {:>10}",
                i + 1,
                q,
                column(&self.joint_velocity_current),
                column(&self.joint_effort_current),
                column(&self.joint_position_desired)
            );
        }
        println!(
            "  cartesian current: {:?} {:?}",
            self.cartesian_current.position, self.cartesian_current.quaternion
        );
        println!(
            "  cartesian desired: {:?} {:?}",
            self.cartesian_desired.position, self.cartesian_desired.quaternion
        );
    }
}

impl StateCommand {
    pub fn execute(&self, arm: &Arm) -> Result<()> {
        let snapshot = ArmSnapshot::capture(arm.name(), arm.observer());
        match self.format {
            OutputFormat::Table => snapshot.print_table(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        }
        Ok(())
    }
}
