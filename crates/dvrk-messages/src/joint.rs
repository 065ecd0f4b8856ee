//! 关节状态
//!
//! 对应控制桥的 `state_joint_desired` / `state_joint_current` 通道以及
//! `set_position_joint` / `set_position_goal_joint` 命令。
//!
//! 关节数量在运行时由第一条关节状态通知确定（PSM 与 MTM 不同），
//! 因此这里使用 `Vec<f64>` 而非定长数组。

use crate::error::MessageError;

/// 关节状态（位置 + 速度 + 力矩）
///
/// `velocity` 和 `effort` 允许为空，表示控制桥未报告该字段。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointState {
    /// 关节名称（可选）
    pub name: Vec<String>,
    /// 关节位置（rad 或 m，取决于关节类型）
    pub position: Vec<f64>,
    /// 关节速度
    pub velocity: Vec<f64>,
    /// 关节力矩
    pub effort: Vec<f64>,
}

impl JointState {
    /// 仅包含位置的关节状态（命令使用）
    pub fn from_positions(position: impl Into<Vec<f64>>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// 全零关节状态（位置/速度/力矩）
    pub fn zeros(joint_count: usize) -> Self {
        Self {
            name: Vec::new(),
            position: vec![0.0; joint_count],
            velocity: vec![0.0; joint_count],
            effort: vec![0.0; joint_count],
        }
    }

    /// 关节数量（以位置数组为准）
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// 是否不含任何关节
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// 检查各数组长度
    ///
    /// - `position` 必须等于 `joint_count`
    /// - `velocity` / `effort` 为空（未报告）或等于 `joint_count`
    pub fn check_len(&self, joint_count: usize) -> Result<(), MessageError> {
        if self.position.len() != joint_count {
            return Err(MessageError::LengthMismatch {
                field: "position",
                expected: joint_count,
                actual: self.position.len(),
            });
        }
        for (field, values) in [("velocity", &self.velocity), ("effort", &self.effort)] {
            if !values.is_empty() && values.len() != joint_count {
                return Err(MessageError::LengthMismatch {
                    field,
                    expected: joint_count,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }
}
