//! 驱动层错误类型定义

use dvrk_messages::MessageError;
use dvrk_transport::TransportError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 通知内容不合法（被拒绝，不更新状态）
    #[error("Rejected notification: {0}")]
    Rejected(#[from] MessageError),

    /// 关节状态通知不含任何关节
    #[error("Empty joint state")]
    EmptyJointState,

    /// 线程创建失败
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// 操作超时
    #[error("Operation timeout")]
    Timeout,
}
