//! 控制器离散状态
//!
//! 控制桥通过 `robot_state` 通道报告当前状态，客户端通过 `set_robot_state`
//! 请求状态转换。两者共用同一套字符串名称。
//!
//! 控制桥被视为完全可信：任何收到的字符串都会被接受为新状态，
//! 未知名称原样保存在 [`ArmState::Other`] 中。

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 机械臂控制器状态
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", from = "String")
)]
pub enum ArmState {
    /// 未初始化（未上电）
    #[default]
    Uninitialized,
    /// 已归零，就绪
    Ready,
    /// 关节直接位置模式
    PositionJoint,
    /// 关节目标位置模式（轨迹生成）
    PositionGoalJoint,
    /// 笛卡尔直接位置模式
    PositionCartesian,
    /// 笛卡尔目标位置模式（轨迹生成）
    PositionGoalCartesian,
    /// 笛卡尔力控模式
    EffortCartesian,
    /// 归零请求（仅用于请求，控制桥不会报告此状态）
    Home,
    /// 其他控制桥报告的状态（如归零过程中的中间状态）
    Other(String),
}

impl ArmState {
    /// 线上名称
    pub fn as_str(&self) -> &str {
        match self {
            ArmState::Uninitialized => "DVRK_UNINITIALIZED",
            ArmState::Ready => "DVRK_READY",
            ArmState::PositionJoint => "DVRK_POSITION_JOINT",
            ArmState::PositionGoalJoint => "DVRK_POSITION_GOAL_JOINT",
            ArmState::PositionCartesian => "DVRK_POSITION_CARTESIAN",
            ArmState::PositionGoalCartesian => "DVRK_POSITION_GOAL_CARTESIAN",
            ArmState::EffortCartesian => "DVRK_EFFORT_CARTESIAN",
            ArmState::Home => "Home",
            ArmState::Other(name) => name,
        }
    }

    /// 从线上名称解析（不做合法性校验）
    pub fn from_wire(name: &str) -> Self {
        match name {
            "DVRK_UNINITIALIZED" => ArmState::Uninitialized,
            "DVRK_READY" => ArmState::Ready,
            "DVRK_POSITION_JOINT" => ArmState::PositionJoint,
            "DVRK_POSITION_GOAL_JOINT" => ArmState::PositionGoalJoint,
            "DVRK_POSITION_CARTESIAN" => ArmState::PositionCartesian,
            "DVRK_POSITION_GOAL_CARTESIAN" => ArmState::PositionGoalCartesian,
            "DVRK_EFFORT_CARTESIAN" => ArmState::EffortCartesian,
            "Home" => ArmState::Home,
            other => ArmState::Other(other.to_string()),
        }
    }

    /// 是否为已知状态名
    pub fn is_known(&self) -> bool {
        !matches!(self, ArmState::Other(_))
    }

    /// 是否为位置控制模式（直接或目标）
    pub fn is_position_mode(&self) -> bool {
        matches!(
            self,
            ArmState::PositionJoint
                | ArmState::PositionGoalJoint
                | ArmState::PositionCartesian
                | ArmState::PositionGoalCartesian
        )
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ArmState::from_wire(s))
    }
}

impl From<&str> for ArmState {
    fn from(name: &str) -> Self {
        ArmState::from_wire(name)
    }
}

impl From<String> for ArmState {
    fn from(name: String) -> Self {
        match ArmState::from_wire(&name) {
            ArmState::Other(_) => ArmState::Other(name),
            known => known,
        }
    }
}

impl From<ArmState> for String {
    fn from(state: ArmState) -> Self {
        match state {
            ArmState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        assert_eq!(ArmState::default(), ArmState::Uninitialized);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ArmState::Ready.as_str(), "DVRK_READY");
        assert_eq!(ArmState::from_wire("DVRK_POSITION_GOAL_JOINT"), ArmState::PositionGoalJoint);
        assert_eq!(ArmState::Home.to_string(), "Home");
    }

    #[test]
    fn test_unknown_state_preserved() {
        let state: ArmState = "DVRK_HOMING_CALIBRATING_ARM".parse().unwrap();
        assert_eq!(state, ArmState::Other("DVRK_HOMING_CALIBRATING_ARM".to_string()));
        assert!(!state.is_known());
        assert_eq!(String::from(state), "DVRK_HOMING_CALIBRATING_ARM");
    }

    #[test]
    fn test_wire_names_are_case_sensitive() {
        // 控制桥完全可信，但名称区分大小写
        assert!(matches!(ArmState::from_wire("dvrk_ready"), ArmState::Other(_)));
    }

    #[test]
    fn test_position_modes() {
        assert!(ArmState::PositionGoalCartesian.is_position_mode());
        assert!(!ArmState::EffortCartesian.is_position_mode());
        assert!(!ArmState::Ready.is_position_mode());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ArmState::EffortCartesian).unwrap();
        assert_eq!(json, "\"DVRK_EFFORT_CARTESIAN\"");
        let back: ArmState = serde_json::from_str("\"DVRK_FAULT\"").unwrap();
        assert_eq!(back, ArmState::Other("DVRK_FAULT".to_string()));
    }
}
