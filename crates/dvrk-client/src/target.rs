//! 笛卡尔运动目标与运动模式

use crate::error::ArmError;
use dvrk_messages::Pose;
use nalgebra::{UnitQuaternion, Vector3};

/// 运动模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// 经控制桥轨迹生成，阻塞直到 `goal_reached`
    #[default]
    Goal,
    /// 直接设定点，发送后立即返回（已发送 ≠ 已完成）
    Direct,
}

/// 笛卡尔目标
///
/// - `Translation`：只改变平移，保留期望旋转
/// - `Rotation`：只改变旋转，保留期望平移
/// - `Pose`：完整位姿
///
/// 列表形式的平移必须恰好包含 3 个元素：
///
/// ```
/// use dvrk_client::CartesianTarget;
///
/// let target = CartesianTarget::try_from(&[0.0, 0.0, -0.1][..]).unwrap();
/// assert!(matches!(target, CartesianTarget::Translation(_)));
/// assert!(CartesianTarget::try_from(&[0.0, 0.0, -0.1, 1.0][..]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CartesianTarget {
    Translation(Vector3<f64>),
    Rotation(UnitQuaternion<f64>),
    Pose(Pose),
}

impl CartesianTarget {
    /// 以 `reference` 为基础解析为绝对位姿
    pub fn resolve(&self, reference: &Pose) -> Pose {
        match *self {
            CartesianTarget::Translation(translation) => reference.with_translation(translation),
            CartesianTarget::Rotation(rotation) => reference.with_rotation(rotation),
            CartesianTarget::Pose(pose) => pose,
        }
    }

    /// 作为增量的刚体变换
    pub fn as_delta(&self) -> Pose {
        match *self {
            CartesianTarget::Translation(translation) => Pose::from_translation(translation),
            CartesianTarget::Rotation(rotation) => Pose::from_rotation(rotation),
            CartesianTarget::Pose(pose) => pose,
        }
    }

    /// 以 `reference` 为基础叠加增量：`delta * reference`
    pub fn compose(&self, reference: &Pose) -> Pose {
        self.as_delta() * *reference
    }

    pub(crate) fn validate(&self) -> Result<(), ArmError> {
        let finite = match self {
            CartesianTarget::Translation(t) => t.iter().all(|v| v.is_finite()),
            CartesianTarget::Rotation(r) => r.coords.iter().all(|v| v.is_finite()),
            CartesianTarget::Pose(p) => {
                p.translation().iter().all(|v| v.is_finite())
                    && p.rotation().coords.iter().all(|v| v.is_finite())
            },
        };
        if finite {
            Ok(())
        } else {
            Err(ArmError::invalid_argument("target", "contains non-finite values"))
        }
    }
}

impl From<Vector3<f64>> for CartesianTarget {
    fn from(translation: Vector3<f64>) -> Self {
        CartesianTarget::Translation(translation)
    }
}

impl From<[f64; 3]> for CartesianTarget {
    fn from(translation: [f64; 3]) -> Self {
        CartesianTarget::Translation(Vector3::from(translation))
    }
}

impl From<UnitQuaternion<f64>> for CartesianTarget {
    fn from(rotation: UnitQuaternion<f64>) -> Self {
        CartesianTarget::Rotation(rotation)
    }
}

impl From<Pose> for CartesianTarget {
    fn from(pose: Pose) -> Self {
        CartesianTarget::Pose(pose)
    }
}

impl TryFrom<&[f64]> for CartesianTarget {
    type Error = ArmError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match values {
            [x, y, z] => Ok(CartesianTarget::Translation(Vector3::new(*x, *y, *z))),
            _ => Err(ArmError::invalid_argument(
                "translation",
                format!("expected 3 elements, got {}", values.len()),
            )),
        }
    }
}

impl TryFrom<Vec<f64>> for CartesianTarget {
    type Error = ArmError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        CartesianTarget::try_from(values.as_slice())
    }
}

impl TryFrom<&Vec<f64>> for CartesianTarget {
    type Error = ArmError;

    fn try_from(values: &Vec<f64>) -> Result<Self, Self::Error> {
        CartesianTarget::try_from(values.as_slice())
    }
}
