//! 驱动层指标
//!
//! 原子计数器，可在任何线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 驱动实时指标
#[derive(Debug, Default)]
pub struct DriverMetrics {
    /// 收到的通知总数（包括被过滤的）
    pub notifications_received: AtomicU64,

    /// 已应用到状态的通知数
    pub notifications_applied: AtomicU64,

    /// 属于其他机械臂/命名空间的通知数
    pub notifications_foreign: AtomicU64,

    /// 过期（序号落后于当前请求）的通知数
    pub notifications_stale: AtomicU64,

    /// 被拒绝的通知数（主题与内容不符、关节数量不符等）
    pub notifications_rejected: AtomicU64,

    /// 接收超时次数（正常现象，无数据时会超时）
    pub receive_timeouts: AtomicU64,

    /// 已发送的命令数
    pub commands_sent: AtomicU64,

    /// 传输错误次数（发送失败或接收错误）
    pub transport_errors: AtomicU64,
}

impl DriverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            notifications_received: self.notifications_received.load(Ordering::Relaxed),
            notifications_applied: self.notifications_applied.load(Ordering::Relaxed),
            notifications_foreign: self.notifications_foreign.load(Ordering::Relaxed),
            notifications_stale: self.notifications_stale.load(Ordering::Relaxed),
            notifications_rejected: self.notifications_rejected.load(Ordering::Relaxed),
            receive_timeouts: self.receive_timeouts.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.notifications_received.store(0, Ordering::Relaxed);
        self.notifications_applied.store(0, Ordering::Relaxed);
        self.notifications_foreign.store(0, Ordering::Relaxed);
        self.notifications_stale.store(0, Ordering::Relaxed);
        self.notifications_rejected.store(0, Ordering::Relaxed);
        self.receive_timeouts.store(0, Ordering::Relaxed);
        self.commands_sent.store(0, Ordering::Relaxed);
        self.transport_errors.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub notifications_received: u64,
    pub notifications_applied: u64,
    pub notifications_foreign: u64,
    pub notifications_stale: u64,
    pub notifications_rejected: u64,
    pub receive_timeouts: u64,
    pub commands_sent: u64,
    pub transport_errors: u64,
}

impl MetricsSnapshot {
    /// 被丢弃的通知数（其他机械臂 + 过期 + 拒绝）
    pub fn notifications_dropped(&self) -> u64 {
        self.notifications_foreign + self.notifications_stale + self.notifications_rejected
    }
}
