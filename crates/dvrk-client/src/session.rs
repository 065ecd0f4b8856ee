//! 会话驱动
//!
//! 把异步通知转换为同步、有超时上限的调用。三种基本模式：
//!
//! - **A `ensure_state`**：已处于目标状态则立即返回；否则发起带序号的
//!   状态请求，等待控制桥报告目标状态
//! - **B `move_direct`**：确保处于直接位置模式后发送设定点，立即返回
//! - **C `move_to_goal`**：确保处于目标位置模式，清除目标锁存器和标志后
//!   发送设定点，等待 `goal_reached`
//!
//! 另外 `home` 发送一次归零请求后最多等待若干轮 `DVRK_READY`，
//! `shutdown` 等价于 `ensure_state(DVRK_UNINITIALIZED)`。
//!
//! 所有等待都有上限，不会重发命令。不得在接收线程中调用本模块的任何方法。

use crate::config::ArmConfig;
use crate::error::{ArmError, Result};
use crate::joints::check_joint_vector;
use crate::target::CartesianTarget;
use dvrk_driver::{ArmContext, CommandChannel, Driver, MetricsSnapshot, WrenchFrame};
use dvrk_messages::{ArmAddress, ArmState, Pose, Wrench};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 位置设定点
#[derive(Debug, Clone, PartialEq)]
pub enum Setpoint {
    /// 完整关节向量
    Joint(Vec<f64>),
    /// 笛卡尔位姿
    Cartesian(Pose),
}

impl Setpoint {
    /// 直接模式对应的控制器状态
    pub fn direct_state(&self) -> ArmState {
        match self {
            Setpoint::Joint(_) => ArmState::PositionJoint,
            Setpoint::Cartesian(_) => ArmState::PositionCartesian,
        }
    }

    /// 目标模式对应的控制器状态
    pub fn goal_state(&self) -> ArmState {
        match self {
            Setpoint::Joint(_) => ArmState::PositionGoalJoint,
            Setpoint::Cartesian(_) => ArmState::PositionGoalCartesian,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// 单个机械臂的阻塞式会话
pub struct Session {
    driver: Driver,
    config: ArmConfig,
}

impl Session {
    pub fn new(driver: Driver, config: ArmConfig) -> Self {
        Self { driver, config }
    }

    /// 机械臂地址
    pub fn address(&self) -> &ArmAddress {
        self.driver.address()
    }

    /// 会话配置
    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    /// 共享状态上下文
    pub fn context(&self) -> &Arc<ArmContext> {
        self.driver.context()
    }

    /// 驱动指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.driver.metrics()
    }

    fn commands(&self) -> &CommandChannel {
        self.driver.commands()
    }

    /// 等待首个关节状态，返回关节数量
    pub fn wait_for_feedback(&self, timeout: Duration) -> Result<usize> {
        Ok(self.driver.wait_for_feedback(timeout)?)
    }

    /// 已确定的关节数量
    pub fn joint_count(&self) -> Result<usize> {
        self.context()
            .joint_count()
            .ok_or(ArmError::JointCountUnknown)
    }

    /// 模式 A：确保控制器处于 `target` 状态
    ///
    /// 已处于目标状态时不发送任何命令。否则发送一次带序号的状态请求，
    /// 在 `timeout` 内等待下一次状态通知，唤醒时不是 `target` 即失败，不会重发。
    pub fn ensure_state(&self, target: ArmState, timeout: Duration) -> Result<()> {
        let ctx = self.context();
        if ctx.robot_state() == target {
            debug!("{} already in {}", self.address(), target);
            return Ok(());
        }

        let latch = ctx.state_latch();
        let seq = latch.begin_request();
        info!("{}: requesting {} (seq={})", self.address(), target, seq);
        self.commands().request_state(target.clone(), Some(seq));

        // 只等待一次：控制桥报告任何其他状态都视为失败
        latch.wait(timeout);
        if ctx.robot_state() == target {
            info!("{}: entered {}", self.address(), target);
            return Ok(());
        }

        let actual = ctx.robot_state();
        error!(
            "{}: failed to enter {} within {:?} (current: {})",
            self.address(),
            target,
            timeout,
            actual
        );
        Err(ArmError::StateTimeout {
            target,
            actual,
            timeout_ms: millis(timeout),
        })
    }

    /// 模式 B：直接设定点
    ///
    /// 返回时命令已发送，但不代表运动已完成。
    pub fn move_direct(&self, setpoint: Setpoint) -> Result<()> {
        self.check_setpoint(&setpoint)?;
        self.ensure_state(setpoint.direct_state(), self.config.state_timeout())?;

        match setpoint {
            Setpoint::Joint(position) => self.commands().send_direct_joint_position(&position),
            Setpoint::Cartesian(pose) => self.commands().send_direct_cartesian_pose(pose),
        }
        Ok(())
    }

    /// 模式 C：目标设定点，阻塞直到到达或超时
    pub fn move_to_goal(&self, setpoint: Setpoint, timeout: Duration) -> Result<()> {
        self.check_setpoint(&setpoint)?;
        self.ensure_state(setpoint.goal_state(), self.config.state_timeout())?;

        let ctx = self.context();
        // 必须在发送之前复位标志并清除锁存器
        ctx.reset_goal();
        let seq = ctx.goal_latch().begin_request();

        let commands = self.commands();
        match setpoint {
            Setpoint::Joint(position) => commands.send_goal_joint_position(&position, Some(seq)),
            Setpoint::Cartesian(pose) => commands.send_goal_cartesian_pose(pose, Some(seq)),
        }

        let signaled = ctx.goal_latch().wait(timeout);
        if signaled && ctx.goal_reached() {
            debug!("{}: goal reached (seq={})", self.address(), seq);
            return Ok(());
        }

        if signaled {
            warn!("{}: control bridge reported goal not reached", self.address());
        } else {
            warn!("{}: goal not reached within {:?}", self.address(), timeout);
        }
        Err(ArmError::GoalTimeout {
            timeout_ms: millis(timeout),
        })
    }

    /// 使用配置中的目标超时执行模式 C
    pub fn move_to_goal_default(&self, setpoint: Setpoint) -> Result<()> {
        self.move_to_goal(setpoint, self.config.goal_timeout())
    }

    /// 归零
    ///
    /// 发送一次 `Home` 请求，然后最多等待 `home_attempts` 轮，每轮
    /// `home_attempt_timeout`，直到控制器报告 `DVRK_READY`。
    pub fn home(&self) -> Result<()> {
        let ctx = self.context();
        let latch = ctx.state_latch();
        let attempts = self.config.home_attempts;
        let attempt_timeout = self.config.home_attempt_timeout();

        let seq = latch.begin_request();
        info!("{}: homing (seq={})", self.address(), seq);
        self.commands().request_state(ArmState::Home, Some(seq));

        for attempt in 1..=attempts {
            latch.wait(attempt_timeout);
            latch.clear();
            let state = ctx.robot_state();
            if state == ArmState::Ready {
                info!("{}: homing complete", self.address());
                return Ok(());
            }
            info!(
                "{}: homing attempt {}/{}, state {}",
                self.address(),
                attempt,
                attempts,
                state
            );
        }

        let actual = ctx.robot_state();
        error!(
            "{}: failed to home after {} attempts (current: {})",
            self.address(),
            attempts,
            actual
        );
        Err(ArmError::AttemptsExhausted {
            target: ArmState::Ready,
            actual,
            attempts,
        })
    }

    /// 关闭：进入 `DVRK_UNINITIALIZED`
    pub fn shutdown(&self) -> Result<()> {
        self.ensure_state(ArmState::Uninitialized, self.config.shutdown_timeout())
    }

    /// 确保处于 `DVRK_EFFORT_CARTESIAN` 后发送力旋量
    pub fn set_wrench(&self, wrench: Wrench, frame: WrenchFrame) -> Result<()> {
        let finite = wrench.force.iter().chain(wrench.torque.iter()).all(|v| v.is_finite());
        if !finite {
            return Err(ArmError::invalid_argument("wrench", "contains non-finite values"));
        }
        self.ensure_state(ArmState::EffortCartesian, self.config.state_timeout())?;
        self.commands().send_wrench(wrench, frame);
        Ok(())
    }

    /// 本体力旋量是否使用绝对方向（不改变控制器状态）
    pub fn set_wrench_body_orientation_absolute(&self, absolute: bool) {
        self.commands().set_wrench_body_orientation_absolute(absolute);
    }

    fn check_setpoint(&self, setpoint: &Setpoint) -> Result<()> {
        match setpoint {
            Setpoint::Joint(position) => check_joint_vector(position, self.joint_count()?),
            Setpoint::Cartesian(pose) => CartesianTarget::Pose(*pose).validate(),
        }
    }
}
