//! 出站命令与入站通知

use crate::channel::Channel;
use crate::geometry::{Pose, Wrench};
use crate::joint::JointState;
use crate::state::ArmState;

/// 出站命令（客户端 → 控制桥）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// 请求状态转换
    SetRobotState(ArmState),
    /// 关节直接位置
    SetPositionJoint(JointState),
    /// 关节目标位置
    SetPositionGoalJoint(JointState),
    /// 笛卡尔直接位姿
    SetPositionCartesian(Pose),
    /// 笛卡尔目标位姿
    SetPositionGoalCartesian(Pose),
    /// 本体坐标系力旋量
    SetWrenchBody(Wrench),
    /// 空间坐标系力旋量
    SetWrenchSpatial(Wrench),
    /// 本体力旋量是否使用绝对方向
    SetWrenchBodyOrientationAbsolute(bool),
}

impl Command {
    /// 命令对应的出站通道
    pub fn channel(&self) -> Channel {
        match self {
            Command::SetRobotState(_) => Channel::SetRobotState,
            Command::SetPositionJoint(_) => Channel::SetPositionJoint,
            Command::SetPositionGoalJoint(_) => Channel::SetPositionGoalJoint,
            Command::SetPositionCartesian(_) => Channel::SetPositionCartesian,
            Command::SetPositionGoalCartesian(_) => Channel::SetPositionGoalCartesian,
            Command::SetWrenchBody(_) => Channel::SetWrenchBody,
            Command::SetWrenchSpatial(_) => Channel::SetWrenchSpatial,
            Command::SetWrenchBodyOrientationAbsolute(_) => {
                Channel::SetWrenchBodyOrientationAbsolute
            },
        }
    }
}

/// 入站通知（控制桥 → 客户端）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// 当前控制器状态
    RobotState(ArmState),
    /// 目标是否到达
    GoalReached(bool),
    /// 期望关节状态
    JointDesired(JointState),
    /// 实测关节状态
    JointCurrent(JointState),
    /// 期望笛卡尔位姿
    CartesianDesired(Pose),
    /// 实测笛卡尔位姿
    CartesianCurrent(Pose),
}

impl Notification {
    /// 通知对应的入站通道
    pub fn channel(&self) -> Channel {
        match self {
            Notification::RobotState(_) => Channel::RobotState,
            Notification::GoalReached(_) => Channel::GoalReached,
            Notification::JointDesired(_) => Channel::StateJointDesired,
            Notification::JointCurrent(_) => Channel::StateJointCurrent,
            Notification::CartesianDesired(_) => Channel::PositionCartesianDesired,
            Notification::CartesianCurrent(_) => Channel::PositionCartesianCurrent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Direction;

    #[test]
    fn test_command_channels_are_outbound() {
        let commands = [
            Command::SetRobotState(ArmState::Home),
            Command::SetPositionJoint(JointState::zeros(6)),
            Command::SetPositionGoalJoint(JointState::zeros(6)),
            Command::SetPositionCartesian(Pose::identity()),
            Command::SetPositionGoalCartesian(Pose::identity()),
            Command::SetWrenchBody(Wrench::default()),
            Command::SetWrenchSpatial(Wrench::default()),
            Command::SetWrenchBodyOrientationAbsolute(true),
        ];
        for command in &commands {
            assert_eq!(command.channel().direction(), Direction::Outbound);
        }
    }

    #[test]
    fn test_notification_channels_are_inbound() {
        let notifications = [
            Notification::RobotState(ArmState::Ready),
            Notification::GoalReached(false),
            Notification::JointDesired(JointState::zeros(7)),
            Notification::JointCurrent(JointState::zeros(7)),
            Notification::CartesianDesired(Pose::identity()),
            Notification::CartesianCurrent(Pose::identity()),
        ];
        for notification in &notifications {
            assert_eq!(notification.channel().direction(), Direction::Inbound);
        }
    }
}
