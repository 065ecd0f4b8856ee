//! 消息层错误类型定义

use thiserror::Error;

/// 消息层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// 主题字符串格式错误
    #[error("Invalid topic '{0}': expected <namespace>/<arm>/<channel>")]
    InvalidTopic(String),

    /// 未知的通道名称
    #[error("Unknown channel '{0}'")]
    UnknownChannel(String),

    /// 数组长度不匹配
    #[error("Invalid length for '{field}': expected {expected}, got {actual}")]
    LengthMismatch {
        /// 字段名
        field: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },
}
