//! 命名通道与主题地址
//!
//! 每个机械臂在 `<namespace>/<arm-name>/` 下暴露一组固定通道：
//! 出站通道由客户端发布命令，入站通道由控制桥发布通知。

use crate::error::MessageError;
use std::fmt;
use std::str::FromStr;

/// 通道方向（以客户端为视角）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 客户端 → 控制桥
    Outbound,
    /// 控制桥 → 客户端
    Inbound,
}

/// 命名通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Channel {
    // 出站
    SetRobotState,
    SetPositionJoint,
    SetPositionGoalJoint,
    SetPositionCartesian,
    SetPositionGoalCartesian,
    SetWrenchBody,
    SetWrenchSpatial,
    SetWrenchBodyOrientationAbsolute,
    // 入站
    RobotState,
    GoalReached,
    StateJointDesired,
    StateJointCurrent,
    PositionCartesianDesired,
    PositionCartesianCurrent,
}

impl Channel {
    /// 全部通道
    pub const ALL: [Channel; 14] = [
        Channel::SetRobotState,
        Channel::SetPositionJoint,
        Channel::SetPositionGoalJoint,
        Channel::SetPositionCartesian,
        Channel::SetPositionGoalCartesian,
        Channel::SetWrenchBody,
        Channel::SetWrenchSpatial,
        Channel::SetWrenchBodyOrientationAbsolute,
        Channel::RobotState,
        Channel::GoalReached,
        Channel::StateJointDesired,
        Channel::StateJointCurrent,
        Channel::PositionCartesianDesired,
        Channel::PositionCartesianCurrent,
    ];

    /// 通道在主题中的名称
    pub fn name(self) -> &'static str {
        match self {
            Channel::SetRobotState => "set_robot_state",
            Channel::SetPositionJoint => "set_position_joint",
            Channel::SetPositionGoalJoint => "set_position_goal_joint",
            Channel::SetPositionCartesian => "set_position_cartesian",
            Channel::SetPositionGoalCartesian => "set_position_goal_cartesian",
            Channel::SetWrenchBody => "set_wrench_body",
            Channel::SetWrenchSpatial => "set_wrench_spatial",
            Channel::SetWrenchBodyOrientationAbsolute => "set_wrench_body_orientation_absolute",
            Channel::RobotState => "robot_state",
            Channel::GoalReached => "goal_reached",
            Channel::StateJointDesired => "state_joint_desired",
            Channel::StateJointCurrent => "state_joint_current",
            Channel::PositionCartesianDesired => "position_cartesian_desired",
            Channel::PositionCartesianCurrent => "position_cartesian_current",
        }
    }

    /// 从名称解析
    pub fn from_name(name: &str) -> Result<Self, MessageError> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.name() == name)
            .ok_or_else(|| MessageError::UnknownChannel(name.to_string()))
    }

    /// 通道方向
    pub fn direction(self) -> Direction {
        match self {
            Channel::SetRobotState
            | Channel::SetPositionJoint
            | Channel::SetPositionGoalJoint
            | Channel::SetPositionCartesian
            | Channel::SetPositionGoalCartesian
            | Channel::SetWrenchBody
            | Channel::SetWrenchSpatial
            | Channel::SetWrenchBodyOrientationAbsolute => Direction::Outbound,
            Channel::RobotState
            | Channel::GoalReached
            | Channel::StateJointDesired
            | Channel::StateJointCurrent
            | Channel::PositionCartesianDesired
            | Channel::PositionCartesianCurrent => Direction::Inbound,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::from_name(s)
    }
}

/// 机械臂地址（命名空间 + 机械臂名称）
///
/// 命名空间总是以 `/` 开头和结尾，例如 `/dvrk/`、`/remote/`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmAddress {
    namespace: String,
    arm: String,
}

impl ArmAddress {
    /// 创建地址
    ///
    /// 命名空间会被规范化：`dvrk`、`/dvrk`、`dvrk/` 均变为 `/dvrk/`。
    pub fn new(namespace: impl AsRef<str>, arm: impl Into<String>) -> Self {
        Self {
            namespace: normalize_namespace(namespace.as_ref()),
            arm: arm.into(),
        }
    }

    /// 命名空间（规范化后）
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 机械臂名称
    pub fn arm(&self) -> &str {
        &self.arm
    }

    /// 该机械臂某个通道的主题
    pub fn topic(&self, channel: Channel) -> Topic {
        Topic {
            address: self.clone(),
            channel,
        }
    }
}

impl fmt::Display for ArmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.arm)
    }
}

fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// 完整主题：`<namespace><arm>/<channel>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topic {
    address: ArmAddress,
    channel: Channel,
}

impl Topic {
    /// 创建主题
    pub fn new(address: ArmAddress, channel: Channel) -> Self {
        Self { address, channel }
    }

    /// 机械臂地址
    pub fn address(&self) -> &ArmAddress {
        &self.address
    }

    /// 通道
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// 从字符串解析，例如 `/dvrk/PSM1/robot_state`
    pub fn parse(topic: &str) -> Result<Self, MessageError> {
        let invalid = || MessageError::InvalidTopic(topic.to_string());

        let (rest, channel) = topic.rsplit_once('/').ok_or_else(invalid)?;
        let channel = Channel::from_name(channel)?;
        let (namespace, arm) = rest.rsplit_once('/').ok_or_else(invalid)?;
        if arm.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            address: ArmAddress::new(namespace, arm),
            channel,
        })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.channel)
    }
}

impl FromStr for Topic {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::parse(s)
    }
}
