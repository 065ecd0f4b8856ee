//! 机械臂接口
//!
//! [`Arm`] 在 [`Session`] 之上提供参数校验和完整的运动函数族：
//!
//! | 族 | 绝对 | 增量 |
//! |---|---|---|
//! | 笛卡尔 | `move_to` / `move_translation` / `move_rotation` / `move_pose` | `dmove` / `dmove_translation` / `dmove_rotation` / `dmove_pose` |
//! | 关节 | `move_joint` / `move_joint_one` / `move_joint_some` | `dmove_joint` / `dmove_joint_one` / `dmove_joint_some` |
//! | 力 | `set_wrench_spatial_force` / `set_wrench_body_force` | |
//!
//! 所有运动函数都接受 [`MotionMode`]：`Goal` 阻塞直到到达，`Direct`
//! 发送后立即返回。所有参数校验都在发送任何命令之前完成。
//!
//! 笛卡尔增量以期望位姿为基础，按 `delta * desired` 合成；关节增量以
//! 期望关节向量为基础，未指定的关节保留期望值。

use crate::builder::ArmBuilder;
use crate::error::{ArmError, Result};
use crate::joints::{Overlay, check_joint_vector, overlay};
use crate::observer::Observer;
use crate::session::{Session, Setpoint};
use crate::target::{CartesianTarget, MotionMode};
use dvrk_driver::{MetricsSnapshot, WrenchFrame};
use dvrk_messages::{ArmAddress, ArmState, Pose, Wrench};
use nalgebra::{UnitQuaternion, Vector3};
use std::time::Duration;

/// dVRK 机械臂
pub struct Arm {
    session: Session,
    observer: Observer,
}

impl Arm {
    /// 创建 Builder
    pub fn builder(name: impl Into<String>) -> ArmBuilder {
        ArmBuilder::new(name)
    }

    pub(crate) fn new(session: Session) -> Self {
        let observer = Observer::new(session.context().clone());
        Self { session, observer }
    }

    /// 机械臂名称（如 `PSM1`）
    pub fn name(&self) -> &str {
        self.session.address().arm()
    }

    /// 机械臂地址
    pub fn address(&self) -> &ArmAddress {
        self.session.address()
    }

    /// 底层会话
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 状态观察器
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// 当前控制器状态
    pub fn robot_state(&self) -> ArmState {
        self.observer.robot_state()
    }

    /// 驱动指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.session.metrics()
    }

    /// 等待首个关节状态，返回关节数量
    pub fn wait_for_feedback(&self, timeout: Duration) -> Result<usize> {
        self.session.wait_for_feedback(timeout)
    }

    // ============================================================
    // 状态
    // ============================================================

    /// 归零
    pub fn home(&self) -> Result<()> {
        self.session.home()
    }

    /// 关闭
    pub fn shutdown(&self) -> Result<()> {
        self.session.shutdown()
    }

    /// 确保处于指定状态（使用配置中的状态超时）
    pub fn ensure_state(&self, target: ArmState) -> Result<()> {
        self.session
            .ensure_state(target, self.session.config().state_timeout())
    }

    // ============================================================
    // 笛卡尔
    // ============================================================

    /// 绝对运动：平移（保留旋转）、旋转（保留平移）或完整位姿
    ///
    /// 列表形式的平移必须恰好 3 个元素，否则返回
    /// [`ArmError::InvalidArgument`] 且不发送任何命令。
    pub fn move_to<T>(&self, target: T, mode: MotionMode) -> Result<()>
    where
        T: TryInto<CartesianTarget>,
        ArmError: From<T::Error>,
    {
        let target = target.try_into()?;
        target.validate()?;
        let pose = target.resolve(&self.observer.cartesian_desired());
        self.send_cartesian(pose, mode)
    }

    pub fn move_translation(&self, translation: Vector3<f64>, mode: MotionMode) -> Result<()> {
        self.move_to(CartesianTarget::Translation(translation), mode)
    }

    pub fn move_rotation(&self, rotation: UnitQuaternion<f64>, mode: MotionMode) -> Result<()> {
        self.move_to(CartesianTarget::Rotation(rotation), mode)
    }

    pub fn move_pose(&self, pose: Pose, mode: MotionMode) -> Result<()> {
        self.move_to(CartesianTarget::Pose(pose), mode)
    }

    /// 增量运动：`delta * desired`
    pub fn dmove<T>(&self, delta: T, mode: MotionMode) -> Result<()>
    where
        T: TryInto<CartesianTarget>,
        ArmError: From<T::Error>,
    {
        let delta = delta.try_into()?;
        delta.validate()?;
        let pose = delta.compose(&self.observer.cartesian_desired());
        self.send_cartesian(pose, mode)
    }

    pub fn dmove_translation(&self, delta: Vector3<f64>, mode: MotionMode) -> Result<()> {
        self.dmove(CartesianTarget::Translation(delta), mode)
    }

    pub fn dmove_rotation(&self, delta: UnitQuaternion<f64>, mode: MotionMode) -> Result<()> {
        self.dmove(CartesianTarget::Rotation(delta), mode)
    }

    pub fn dmove_pose(&self, delta: Pose, mode: MotionMode) -> Result<()> {
        self.dmove(CartesianTarget::Pose(delta), mode)
    }

    fn send_cartesian(&self, pose: Pose, mode: MotionMode) -> Result<()> {
        self.dispatch(Setpoint::Cartesian(pose), mode)
    }

    // ============================================================
    // 关节
    // ============================================================

    /// 绝对关节运动（完整向量）
    pub fn move_joint(&self, position: &[f64], mode: MotionMode) -> Result<()> {
        check_joint_vector(position, self.session.joint_count()?)?;
        self.dispatch(Setpoint::Joint(position.to_vec()), mode)
    }

    /// 增量关节运动（完整向量，以期望关节位置为基础）
    pub fn dmove_joint(&self, delta: &[f64], mode: MotionMode) -> Result<()> {
        let base = self.desired_joint_base()?;
        check_joint_vector(delta, base.len())?;
        let indices: Vec<usize> = (0..base.len()).collect();
        let position = overlay(&base, delta, &indices, Overlay::Delta)?;
        self.dispatch(Setpoint::Joint(position), mode)
    }

    pub fn move_joint_one(&self, value: f64, index: usize, mode: MotionMode) -> Result<()> {
        self.move_joint_some(&[value], &[index], mode)
    }

    pub fn dmove_joint_one(&self, delta: f64, index: usize, mode: MotionMode) -> Result<()> {
        self.dmove_joint_some(&[delta], &[index], mode)
    }

    /// 只设置指定索引的关节，其余关节保留期望值
    pub fn move_joint_some(
        &self,
        values: &[f64],
        indices: &[usize],
        mode: MotionMode,
    ) -> Result<()> {
        let base = self.desired_joint_base()?;
        let position = overlay(&base, values, indices, Overlay::Absolute)?;
        self.dispatch(Setpoint::Joint(position), mode)
    }

    /// 只对指定索引的关节叠加增量，其余关节保留期望值
    pub fn dmove_joint_some(
        &self,
        deltas: &[f64],
        indices: &[usize],
        mode: MotionMode,
    ) -> Result<()> {
        let base = self.desired_joint_base()?;
        let position = overlay(&base, deltas, indices, Overlay::Delta)?;
        self.dispatch(Setpoint::Joint(position), mode)
    }

    /// 期望关节位置（长度必须等于已确定的关节数量）
    fn desired_joint_base(&self) -> Result<Vec<f64>> {
        let count = self.session.joint_count()?;
        let desired = self.observer.joint_position_desired();
        if desired.len() != count {
            return Err(ArmError::JointCountUnknown);
        }
        Ok(desired)
    }

    // ============================================================
    // 力
    // ============================================================

    /// 空间坐标系力（力矩为零）
    pub fn set_wrench_spatial_force(&self, force: Vector3<f64>) -> Result<()> {
        self.session
            .set_wrench(Wrench::from_force(force), WrenchFrame::Spatial)
    }

    /// 本体坐标系力（力矩为零）
    pub fn set_wrench_body_force(&self, force: Vector3<f64>) -> Result<()> {
        self.session
            .set_wrench(Wrench::from_force(force), WrenchFrame::Body)
    }

    /// 本体力旋量是否使用绝对方向
    pub fn set_wrench_body_orientation_absolute(&self, absolute: bool) {
        self.session.set_wrench_body_orientation_absolute(absolute);
    }

    fn dispatch(&self, setpoint: Setpoint, mode: MotionMode) -> Result<()> {
        match mode {
            MotionMode::Goal => self.session.move_to_goal_default(setpoint),
            MotionMode::Direct => self.session.move_direct(setpoint),
        }
    }
}
