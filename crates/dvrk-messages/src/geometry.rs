//! 笛卡尔空间类型
//!
//! 提供位姿（刚体变换）与力旋量的表示。
//!
//! # 位姿合成
//!
//! `a * b` 表示先应用 `b` 再应用 `a`（与刚体变换矩阵乘法一致），
//! 增量运动使用 `delta * desired` 得到目标位姿。

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::fmt;
use std::ops::Mul;

/// 刚体位姿（旋转 + 平移，不可变）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    isometry: Isometry3<f64>,
}

impl Pose {
    /// 从平移和旋转创建
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            isometry: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// 单位位姿（无平移、无旋转）
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// 仅平移
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(translation, UnitQuaternion::identity())
    }

    /// 仅旋转
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self::new(Vector3::zeros(), rotation)
    }

    /// 从 geometry_msgs/Pose 字段顺序创建（位置 xyz + 四元数 xyzw）
    ///
    /// 四元数会被归一化。
    pub fn from_position_quaternion(position: [f64; 3], quaternion: [f64; 4]) -> Self {
        let [qx, qy, qz, qw] = quaternion;
        let rotation =
            UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(qw, qx, qy, qz));
        Self::new(Vector3::from(position), rotation)
    }

    /// 转换为 geometry_msgs/Pose 字段顺序（位置 xyz, 四元数 xyzw）
    pub fn to_position_quaternion(&self) -> ([f64; 3], [f64; 4]) {
        let t = self.translation();
        let q = self.rotation();
        ([t.x, t.y, t.z], [q.i, q.j, q.k, q.w])
    }

    /// 从 nalgebra 刚体变换创建
    pub fn from_isometry(isometry: Isometry3<f64>) -> Self {
        Self { isometry }
    }

    /// 底层刚体变换
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.isometry
    }

    /// 平移分量
    pub fn translation(&self) -> Vector3<f64> {
        self.isometry.translation.vector
    }

    /// 旋转分量
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.isometry.rotation
    }

    /// 替换平移，保留旋转
    pub fn with_translation(&self, translation: Vector3<f64>) -> Self {
        Self::new(translation, self.rotation())
    }

    /// 替换旋转，保留平移
    pub fn with_rotation(&self, rotation: UnitQuaternion<f64>) -> Self {
        Self::new(self.translation(), rotation)
    }

    /// 近似相等（平移误差与旋转角误差均小于 `eps`）
    pub fn approx_eq(&self, other: &Pose, eps: f64) -> bool {
        (self.translation() - other.translation()).norm() < eps
            && self.rotation().angle_to(&other.rotation()) < eps
    }
}

impl Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            isometry: self.isometry * rhs.isometry,
        }
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(isometry: Isometry3<f64>) -> Self {
        Self::from_isometry(isometry)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation();
        let (roll, pitch, yaw) = self.rotation().euler_angles();
        write!(
            f,
            "p=({:.4}, {:.4}, {:.4}) rpy=({:.4}, {:.4}, {:.4})",
            t.x, t.y, t.z, roll, pitch, yaw
        )
    }
}

/// 力旋量（力 + 力矩）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wrench {
    /// 力（N）
    pub force: Vector3<f64>,
    /// 力矩（N·m）
    pub torque: Vector3<f64>,
}

impl Wrench {
    /// 创建力旋量
    pub fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    /// 仅力，力矩为零
    pub fn from_force(force: Vector3<f64>) -> Self {
        Self::new(force, Vector3::zeros())
    }
}
