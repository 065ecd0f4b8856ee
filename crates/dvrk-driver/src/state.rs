//! 机械臂状态跟踪
//!
//! [`ArmContext`] 保存控制桥最近一次报告的全部状态，由接收线程写入、
//! 前台线程读取：
//!
//! - 控制器状态 + 状态锁存器
//! - 目标到达标志 + 目标锁存器
//! - 期望/实测关节状态、期望/实测笛卡尔位姿
//!
//! 每个实体通过 `ArcSwap` 整体替换，读者永远不会看到半更新的值。
//! 多个实体之间的读取不是事务性的。
//!
//! # 关节数量
//!
//! 关节数量由本会话第一条关节状态通知确定，此后长度不一致的通知会被拒绝
//! （不会调整大小）。

use crate::error::DriverError;
use crate::latch::EventLatch;
use arc_swap::ArcSwap;
use dvrk_messages::{ArmState, JointState, Pose};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 机械臂上下文（所有状态的聚合）
#[derive(Debug)]
pub struct ArmContext {
    robot_state: ArcSwap<ArmState>,
    goal_reached: AtomicBool,
    joint_desired: ArcSwap<JointState>,
    joint_current: ArcSwap<JointState>,
    cartesian_desired: ArcSwap<Pose>,
    cartesian_current: ArcSwap<Pose>,
    joint_count: OnceLock<usize>,
    state_latch: EventLatch,
    goal_latch: EventLatch,
    /// 关节数量确定时触发
    feedback_latch: EventLatch,
}

impl Default for ArmContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ArmContext {
    /// 创建初始上下文（未初始化状态、空关节、单位位姿）
    pub fn new() -> Self {
        Self {
            robot_state: ArcSwap::from_pointee(ArmState::Uninitialized),
            goal_reached: AtomicBool::new(false),
            joint_desired: ArcSwap::from_pointee(JointState::default()),
            joint_current: ArcSwap::from_pointee(JointState::default()),
            cartesian_desired: ArcSwap::from_pointee(Pose::identity()),
            cartesian_current: ArcSwap::from_pointee(Pose::identity()),
            joint_count: OnceLock::new(),
            state_latch: EventLatch::new(),
            goal_latch: EventLatch::new(),
            feedback_latch: EventLatch::new(),
        }
    }

    // ============================================================
    // 读取
    // ============================================================

    /// 当前控制器状态
    pub fn robot_state(&self) -> ArmState {
        self.robot_state.load().as_ref().clone()
    }

    /// 目标到达标志
    pub fn goal_reached(&self) -> bool {
        self.goal_reached.load(Ordering::Acquire)
    }

    /// 期望关节状态
    pub fn joint_desired(&self) -> Arc<JointState> {
        self.joint_desired.load_full()
    }

    /// 实测关节状态
    pub fn joint_current(&self) -> Arc<JointState> {
        self.joint_current.load_full()
    }

    /// 期望笛卡尔位姿
    pub fn cartesian_desired(&self) -> Pose {
        **self.cartesian_desired.load()
    }

    /// 实测笛卡尔位姿
    pub fn cartesian_current(&self) -> Pose {
        **self.cartesian_current.load()
    }

    /// 关节数量（尚未收到关节状态时为 `None`）
    pub fn joint_count(&self) -> Option<usize> {
        self.joint_count.get().copied()
    }

    /// 状态锁存器
    pub fn state_latch(&self) -> &EventLatch {
        &self.state_latch
    }

    /// 目标锁存器
    pub fn goal_latch(&self) -> &EventLatch {
        &self.goal_latch
    }

    /// 复位目标到达标志（在发送目标命令之前调用）
    pub fn reset_goal(&self) {
        self.goal_reached.store(false, Ordering::Release);
    }

    /// 等待关节数量确定
    pub fn wait_for_joint_count(&self, timeout: Duration) -> Option<usize> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if let Some(count) = self.joint_count() {
                return Some(count);
            }
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            if remaining.is_zero() || !self.feedback_latch.wait(remaining) {
                return self.joint_count();
            }
        }
    }

    // ============================================================
    // 通知处理（仅由接收线程调用）
    // ============================================================

    /// 控制器状态通知
    ///
    /// 返回 `false` 表示过期的带序号通知被丢弃。
    pub fn on_state_changed(&self, state: ArmState, seq: Option<u64>) -> bool {
        self.state_latch.signal_with(seq, || {
            debug!("Robot state -> {}", state);
            self.robot_state.store(Arc::new(state));
        })
    }

    /// 目标到达通知
    ///
    /// 返回 `false` 表示过期的带序号通知被丢弃。
    pub fn on_goal_reached(&self, reached: bool, seq: Option<u64>) -> bool {
        self.goal_latch.signal_with(seq, || {
            self.goal_reached.store(reached, Ordering::Release);
        })
    }

    /// 期望关节状态通知
    pub fn on_joint_desired(&self, joints: JointState) -> Result<(), DriverError> {
        self.check_joints(&joints)?;
        self.joint_desired.store(Arc::new(joints));
        Ok(())
    }

    /// 实测关节状态通知
    pub fn on_joint_current(&self, joints: JointState) -> Result<(), DriverError> {
        self.check_joints(&joints)?;
        self.joint_current.store(Arc::new(joints));
        Ok(())
    }

    /// 期望笛卡尔位姿通知
    pub fn on_cartesian_desired(&self, pose: Pose) {
        self.cartesian_desired.store(Arc::new(pose));
    }

    /// 实测笛卡尔位姿通知
    pub fn on_cartesian_current(&self, pose: Pose) {
        self.cartesian_current.store(Arc::new(pose));
    }

    /// 校验关节状态长度，首次调用时确定关节数量
    fn check_joints(&self, joints: &JointState) -> Result<(), DriverError> {
        if joints.is_empty() {
            return Err(DriverError::EmptyJointState);
        }
        // 自身不一致的通知不能确定关节数量
        joints.check_len(joints.len())?;
        let mut established = false;
        let expected = *self.joint_count.get_or_init(|| {
            established = true;
            joints.len()
        });
        joints.check_len(expected)?;
        if established {
            info!("Joint count established: {}", expected);
            self.feedback_latch.signal();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvrk_messages::MessageError;
    use nalgebra::Vector3;
    use std::thread;

    #[test]
    fn test_initial_values() {
        let ctx = ArmContext::new();
        assert_eq!(ctx.robot_state(), ArmState::Uninitialized);
        assert!(!ctx.goal_reached());
        assert!(ctx.joint_desired().is_empty());
        assert_eq!(ctx.cartesian_current(), Pose::identity());
        assert_eq!(ctx.joint_count(), None);
    }

    #[test]
    fn test_state_change_signals_latch() {
        let ctx = ArmContext::new();
        assert!(ctx.on_state_changed(ArmState::Ready, None));
        assert_eq!(ctx.robot_state(), ArmState::Ready);
        assert!(ctx.state_latch().is_signaled());
    }

    #[test]
    fn test_stale_state_notification_ignored() {
        let ctx = ArmContext::new();
        let first = ctx.state_latch().begin_request();
        let _second = ctx.state_latch().begin_request();

        assert!(!ctx.on_state_changed(ArmState::Ready, Some(first)));
        assert_eq!(ctx.robot_state(), ArmState::Uninitialized);
        assert!(!ctx.state_latch().is_signaled());
    }

    #[test]
    fn test_goal_reached() {
        let ctx = ArmContext::new();
        assert!(ctx.on_goal_reached(true, None));
        assert!(ctx.goal_reached());
        ctx.reset_goal();
        assert!(!ctx.goal_reached());
    }

    #[test]
    fn test_joint_count_fixed_by_first_notification() {
        let ctx = ArmContext::new();
        ctx.on_joint_desired(JointState::zeros(6)).unwrap();
        assert_eq!(ctx.joint_count(), Some(6));

        // 长度不一致：拒绝，不调整大小
        let err = ctx.on_joint_current(JointState::zeros(7)).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Rejected(MessageError::LengthMismatch { expected: 6, actual: 7, .. })
        ));
        assert!(ctx.joint_current().is_empty());
        assert_eq!(ctx.joint_count(), Some(6));
    }

    #[test]
    fn test_empty_joint_state_rejected() {
        let ctx = ArmContext::new();
        assert!(matches!(
            ctx.on_joint_desired(JointState::default()),
            Err(DriverError::EmptyJointState)
        ));
        assert_eq!(ctx.joint_count(), None);
    }

    #[test]
    fn test_malformed_first_notification_does_not_fix_count() {
        let ctx = ArmContext::new();
        let mut joints = JointState::zeros(6);
        joints.velocity.truncate(3);
        assert!(matches!(
            ctx.on_joint_current(joints),
            Err(DriverError::Rejected(MessageError::LengthMismatch { .. }))
        ));
        assert_eq!(ctx.joint_count(), None);

        ctx.on_joint_current(JointState::zeros(7)).unwrap();
        assert_eq!(ctx.joint_count(), Some(7));
        assert_eq!(ctx.wait_for_joint_count(Duration::from_millis(10)), Some(7));
    }

    #[test]
    fn test_wait_for_joint_count_unbounded_timeout() {
        let ctx = Arc::new(ArmContext::new());
        let writer = {
            let ctx = ctx.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                ctx.on_joint_desired(JointState::zeros(6)).unwrap();
            })
        };
        assert_eq!(ctx.wait_for_joint_count(Duration::MAX), Some(6));
        writer.join().unwrap();
    }

    #[test]
    fn test_cartesian_swap() {
        let ctx = ArmContext::new();
        let pose = Pose::from_translation(Vector3::new(0.0, 0.0, -0.12));
        ctx.on_cartesian_desired(pose);
        assert_eq!(ctx.cartesian_desired(), pose);
        assert_eq!(ctx.cartesian_current(), Pose::identity());
    }

    #[test]
    fn test_wait_for_joint_count() {
        let ctx = Arc::new(ArmContext::new());
        assert_eq!(ctx.wait_for_joint_count(Duration::from_millis(10)), None);

        let writer = {
            let ctx = ctx.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                ctx.on_joint_current(JointState::zeros(7)).unwrap();
            })
        };
        assert_eq!(ctx.wait_for_joint_count(Duration::from_secs(2)), Some(7));
        writer.join().unwrap();
    }
}
