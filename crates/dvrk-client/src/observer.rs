//! Observer - 状态观察器
//!
//! 只读访问控制桥最近一次报告的状态，与会话命令完全独立。
//! 可克隆，可在其他线程中并发读取。
//!
//! ```rust,no_run
//! # use dvrk_client::Observer;
//! # fn example(observer: Observer) {
//! let observer2 = observer.clone();
//! std::thread::spawn(move || {
//!     let effort = observer2.joint_effort_current();
//!     println!("effort: {:?}", effort);
//! });
//! println!("state: {}", observer.robot_state());
//! # }
//! ```

use dvrk_driver::ArmContext;
use dvrk_messages::{ArmState, JointState, Pose};
use std::sync::Arc;

/// 状态观察器（只读）
#[derive(Debug, Clone)]
pub struct Observer {
    ctx: Arc<ArmContext>,
}

impl Observer {
    pub fn new(ctx: Arc<ArmContext>) -> Self {
        Self { ctx }
    }

    /// 当前控制器状态
    pub fn robot_state(&self) -> ArmState {
        self.ctx.robot_state()
    }

    /// 最近一次目标运动是否到达
    pub fn goal_reached(&self) -> bool {
        self.ctx.goal_reached()
    }

    /// 关节数量（尚未收到关节状态时为 `None`）
    pub fn joint_count(&self) -> Option<usize> {
        self.ctx.joint_count()
    }

    /// 实测笛卡尔位姿
    pub fn cartesian_current(&self) -> Pose {
        self.ctx.cartesian_current()
    }

    /// 期望笛卡尔位姿
    pub fn cartesian_desired(&self) -> Pose {
        self.ctx.cartesian_desired()
    }

    /// 实测关节状态（完整快照）
    pub fn joint_current(&self) -> Arc<JointState> {
        self.ctx.joint_current()
    }

    /// 期望关节状态（完整快照）
    pub fn joint_desired(&self) -> Arc<JointState> {
        self.ctx.joint_desired()
    }

    pub fn joint_position_current(&self) -> Vec<f64> {
        self.ctx.joint_current().position.clone()
    }

    pub fn joint_velocity_current(&self) -> Vec<f64> {
        self.ctx.joint_current().velocity.clone()
    }

    pub fn joint_effort_current(&self) -> Vec<f64> {
        self.ctx.joint_current().effort.clone()
    }

    pub fn joint_position_desired(&self) -> Vec<f64> {
        self.ctx.joint_desired().position.clone()
    }

    pub fn joint_effort_desired(&self) -> Vec<f64> {
        self.ctx.joint_desired().effort.clone()
    }
}
