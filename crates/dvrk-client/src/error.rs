//! 错误类型体系
//!
//! 会话层的所有失败都以 [`ArmError`] 返回，不会 panic：
//!
//! - 参数校验失败（[`ArmError::InvalidArgument`]、[`ArmError::JointCountUnknown`]）
//!   发生在任何命令发送之前
//! - 超时（[`ArmError::StateTimeout`]、[`ArmError::GoalTimeout`]）表示控制桥
//!   在时限内没有给出期望的反应
//! - 归零重试耗尽（[`ArmError::AttemptsExhausted`]）
//!
//! # 示例
//!
//! ```rust
//! use dvrk_client::ArmError;
//!
//! fn handle_error(err: ArmError) {
//!     if err.is_validation() {
//!         eprintln!("invalid call: {}", err);
//!     } else if err.is_retryable() {
//!         eprintln!("retryable: {}", err);
//!     } else {
//!         eprintln!("error: {}", err);
//!     }
//! }
//! ```

use dvrk_driver::DriverError;
use dvrk_messages::ArmState;
use std::convert::Infallible;
use thiserror::Error;

/// 会话层错误类型
#[derive(Debug, Error)]
pub enum ArmError {
    // ==================== Validation ====================
    /// 参数无效（未发送任何命令）
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument {
        /// 参数名
        param: String,
        /// 原因
        reason: String,
    },

    /// 尚未收到关节状态，关节数量未知
    #[error("Joint count unknown: no joint state received yet")]
    JointCountUnknown,

    // ==================== Timeouts ====================
    /// 状态转换超时
    #[error("State {target} not reached within {timeout_ms}ms (current: {actual})")]
    StateTimeout {
        /// 目标状态
        target: ArmState,
        /// 超时时的实际状态
        actual: ArmState,
        /// 超时时间（毫秒）
        timeout_ms: u64,
    },

    /// 目标运动超时（或控制桥报告目标未到达）
    #[error("Goal not reached within {timeout_ms}ms")]
    GoalTimeout {
        /// 超时时间（毫秒）
        timeout_ms: u64,
    },

    /// 多次等待后仍未到达目标状态（归零）
    #[error("State {target} not reached after {attempts} attempts (current: {actual})")]
    AttemptsExhausted {
        /// 目标状态
        target: ArmState,
        /// 最终状态
        actual: ArmState,
        /// 尝试次数
        attempts: u32,
    },

    // ==================== Other ====================
    /// 驱动层错误
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArmError {
    /// 创建参数错误
    pub fn invalid_argument(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::StateTimeout { .. } | Self::GoalTimeout { .. })
    }

    /// 是否为参数校验错误（调用未产生任何网络副作用）
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::JointCountUnknown)
    }

    /// 是否可重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StateTimeout { .. }
                | Self::GoalTimeout { .. }
                | Self::AttemptsExhausted { .. }
                | Self::Driver(DriverError::Timeout)
        )
    }
}

impl From<Infallible> for ArmError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ArmError>;
