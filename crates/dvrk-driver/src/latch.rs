//! 事件锁存器
//!
//! 单槽、电平触发的信号：通知线程 `signal`，前台线程 `wait`。
//! 在一次 `wait` 之前的多次 `signal` 合并为一次。
//!
//! # 请求序号
//!
//! 每次发起需要确认的请求前调用 [`EventLatch::begin_request`]：清除信号并
//! 递增请求序号。通知通过 [`EventLatch::signal_with`] 投递：
//!
//! - 不带序号的通知：总是被接受（保持电平触发语义）
//! - 带序号的通知：仅当序号 `>=` 当前请求序号时被接受，否则视为
//!   上一个请求的过期响应，既不更新状态也不触发信号
//!
//! 状态更新闭包在锁内执行，因此"检查序号 → 更新状态 → 触发信号"
//! 对 `begin_request` 是原子的。

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct LatchInner {
    signaled: bool,
    seq: u64,
}

/// 事件锁存器（Mutex + Condvar）
#[derive(Debug, Default)]
pub struct EventLatch {
    inner: Mutex<LatchInner>,
    cond: Condvar,
}

impl EventLatch {
    /// 创建未触发的锁存器
    pub fn new() -> Self {
        Self::default()
    }

    /// 重置为未触发（不改变请求序号）
    pub fn clear(&self) {
        self.inner.lock().signaled = false;
    }

    /// 触发并唤醒所有等待者
    pub fn signal(&self) {
        let mut inner = self.inner.lock();
        inner.signaled = true;
        self.cond.notify_all();
    }

    /// 当前是否已触发
    pub fn is_signaled(&self) -> bool {
        self.inner.lock().signaled
    }

    /// 当前请求序号（尚未发起请求时为 0）
    pub fn current_seq(&self) -> u64 {
        self.inner.lock().seq
    }

    /// 开始一个新请求：清除信号并返回新的请求序号
    pub fn begin_request(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.signaled = false;
        inner.seq += 1;
        inner.seq
    }

    /// 按序号投递通知
    ///
    /// 接受时在锁内执行 `apply` 并触发信号，返回 `true`；
    /// 过期的带序号通知被丢弃，返回 `false`。
    pub fn signal_with(&self, seq: Option<u64>, apply: impl FnOnce()) -> bool {
        let mut inner = self.inner.lock();
        if let Some(seq) = seq
            && seq < inner.seq
        {
            return false;
        }
        apply();
        inner.signaled = true;
        self.cond.notify_all();
        true
    }

    /// 阻塞直到被触发或超时
    ///
    /// 返回唤醒时是否处于触发状态。超时过大（截止时间无法表示）时不设上限。
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.inner.lock();
        while !inner.signaled {
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut inner, deadline).timed_out() {
                        break;
                    }
                },
                None => self.cond.wait(&mut inner),
            }
        }
        inner.signaled
    }
}
