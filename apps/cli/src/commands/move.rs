//! 绝对关节运动命令

use super::motion_mode;
use crate::validation::{parse_indices, parse_values};
use anyhow::Result;
use clap::Args;
use dvrk_sdk::Arm;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标关节位置，逗号分隔
    /// 例如：0.1,0.2,0.3,0.4,0.5,0.6
    #[arg(short, long)]
    pub joints: String,

    /// 只移动这些关节（从 0 开始，逗号分隔，与 --joints 一一对应）
    #[arg(short, long)]
    pub indices: Option<String>,

    /// 直接模式（不等待到达）
    #[arg(long)]
    pub direct: bool,
}

impl MoveCommand {
    pub fn execute(&self, arm: &Arm) -> Result<()> {
        let values = parse_values(&self.joints, "关节位置")?;
        let mode = motion_mode(self.direct);

        println!("⏳ 正在移动 ({:?})...", mode);
        match &self.indices {
            Some(indices) => {
                let indices = parse_indices(indices)?;
                arm.move_joint_some(&values, &indices, mode)?;
            },
            None => arm.move_joint(&values, mode)?,
        }

        print_joints(&arm.observer().joint_position_desired());
        println!("✅ 移动完成");
        Ok(())
    }
}

/// 打印关节位置
pub fn print_joints(position: &[f64]) {
    for (i, pos) in position.iter().enumerate() {
        println!("  J{}: {:.4}", i + 1, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, ConnectionArgs};
    use dvrk_sdk::ArmState;

    fn connect() -> Connection {
        Connection::open(&ConnectionArgs {
            arm: "PSM1".to_string(),
            namespace: None,
            config: None,
            sim_joints: Some(6),
            initial_state: Some(ArmState::Ready),
        })
        .unwrap()
    }

    #[test]
    fn test_move_some_joints() {
        let connection = connect();
        let cmd = MoveCommand {
            joints: "0.1".to_string(),
            indices: Some("2".to_string()),
            direct: false,
        };
        cmd.execute(connection.arm()).unwrap();
        assert_eq!(
            connection.arm().observer().joint_position_desired(),
            vec![0.0, 0.0, 0.1, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_move_rejects_wrong_length() {
        let connection = connect();
        let cmd = MoveCommand {
            joints: "0.1,0.2,0.3".to_string(),
            indices: None,
            direct: true,
        };
        assert!(cmd.execute(connection.arm()).is_err());
    }
}
