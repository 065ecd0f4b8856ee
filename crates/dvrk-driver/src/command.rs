//! 命令通道
//!
//! 一次性、非阻塞的出站命令，不等待任何确认。发送失败不会返回给调用者
//! （记录 `warn` 日志并计入指标）；调用方通过状态/目标超时把"没有反应"
//! 转换为失败。

use crate::metrics::DriverMetrics;
use dvrk_messages::{ArmAddress, ArmState, Command, Envelope, JointState, Pose, Wrench};
use dvrk_transport::Publisher;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{trace, warn};

/// 力旋量参考坐标系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrenchFrame {
    /// 空间（基座）坐标系
    #[default]
    Spatial,
    /// 本体（末端）坐标系
    Body,
}

/// 命令通道
pub struct CommandChannel {
    address: ArmAddress,
    publisher: Mutex<Box<dyn Publisher + Send>>,
    metrics: Arc<DriverMetrics>,
}

impl fmt::Debug for CommandChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandChannel")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl CommandChannel {
    pub fn new(
        address: ArmAddress,
        publisher: Box<dyn Publisher + Send>,
        metrics: Arc<DriverMetrics>,
    ) -> Self {
        Self {
            address,
            publisher: Mutex::new(publisher),
            metrics,
        }
    }

    /// 目标机械臂地址
    pub fn address(&self) -> &ArmAddress {
        &self.address
    }

    /// 发送任意命令（可带请求序号）
    pub fn send(&self, command: Command, seq: Option<u64>) {
        let envelope = Envelope::command(&self.address, command).with_optional_seq(seq);
        trace!("Sending {} (seq={:?})", envelope.topic, seq);

        let topic = envelope.topic.clone();
        match self.publisher.lock().publish(envelope) {
            Ok(()) => {
                self.metrics.commands_sent.fetch_add(1, Ordering::Relaxed);
            },
            Err(e) => {
                self.metrics.transport_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to publish {}: {}", topic, e);
            },
        }
    }

    /// 请求状态转换
    pub fn request_state(&self, state: ArmState, seq: Option<u64>) {
        self.send(Command::SetRobotState(state), seq);
    }

    /// 关节直接位置
    pub fn send_direct_joint_position(&self, position: &[f64]) {
        self.send(
            Command::SetPositionJoint(JointState::from_positions(position)),
            None,
        );
    }

    /// 关节目标位置
    pub fn send_goal_joint_position(&self, position: &[f64], seq: Option<u64>) {
        self.send(
            Command::SetPositionGoalJoint(JointState::from_positions(position)),
            seq,
        );
    }

    /// 笛卡尔直接位姿
    pub fn send_direct_cartesian_pose(&self, pose: Pose) {
        self.send(Command::SetPositionCartesian(pose), None);
    }

    /// 笛卡尔目标位姿
    pub fn send_goal_cartesian_pose(&self, pose: Pose, seq: Option<u64>) {
        self.send(Command::SetPositionGoalCartesian(pose), seq);
    }

    /// 力旋量
    pub fn send_wrench(&self, wrench: Wrench, frame: WrenchFrame) {
        let command = match frame {
            WrenchFrame::Spatial => Command::SetWrenchSpatial(wrench),
            WrenchFrame::Body => Command::SetWrenchBody(wrench),
        };
        self.send(command, None);
    }

    /// 本体力旋量是否使用绝对方向
    pub fn set_wrench_body_orientation_absolute(&self, absolute: bool) {
        self.send(Command::SetWrenchBodyOrientationAbsolute(absolute), None);
    }
}
