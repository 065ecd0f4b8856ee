//! 通知接收循环
//!
//! 后台接收线程负责：
//! 1. 带超时地从订阅端接收通知（超时用于检查运行标志）
//! 2. 过滤其他机械臂/命名空间的通知和主题与内容不符的通知
//! 3. 将通知分发到 [`ArmContext`] 的处理函数
//!
//! 所有状态处理函数都在此线程上运行。此线程绝不发起阻塞命令。

use crate::error::DriverError;
use crate::metrics::DriverMetrics;
use crate::state::ArmContext;
use dvrk_messages::{ArmAddress, Envelope, Notification};
use dvrk_transport::{Subscriber, TransportError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Pipeline 配置
///
/// ```
/// use dvrk_driver::PipelineConfig;
///
/// let config = PipelineConfig {
///     receive_timeout_ms: 5,
///     ..PipelineConfig::default()
/// };
/// assert_eq!(config.join_timeout_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// 接收超时（毫秒），决定停止请求的响应延迟
    pub receive_timeout_ms: u64,
    /// Drop 时等待接收线程退出的最长时间（毫秒）
    pub join_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            receive_timeout_ms: 10,
            join_timeout_ms: 2000,
        }
    }
}

/// 分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// 已更新状态
    Applied,
    /// 过期的带序号通知，已丢弃
    Stale,
}

/// 将一条通知分发到上下文
pub fn dispatch(
    ctx: &ArmContext,
    envelope: Envelope<Notification>,
) -> Result<Dispatch, DriverError> {
    let seq = envelope.seq;
    let accepted = match envelope.body {
        Notification::RobotState(state) => ctx.on_state_changed(state, seq),
        Notification::GoalReached(reached) => ctx.on_goal_reached(reached, seq),
        Notification::JointDesired(joints) => {
            ctx.on_joint_desired(joints)?;
            true
        },
        Notification::JointCurrent(joints) => {
            ctx.on_joint_current(joints)?;
            true
        },
        Notification::CartesianDesired(pose) => {
            ctx.on_cartesian_desired(pose);
            true
        },
        Notification::CartesianCurrent(pose) => {
            ctx.on_cartesian_current(pose);
            true
        },
    };
    Ok(if accepted {
        Dispatch::Applied
    } else {
        Dispatch::Stale
    })
}

/// 接收线程主循环
///
/// # 参数
/// - `subscriber`: 通知订阅端
/// - `ctx`: 共享状态上下文
/// - `address`: 本会话的机械臂地址（用于过滤）
/// - `config`: Pipeline 配置
/// - `is_running`: 运行标志（`false` 时退出；订阅端断开时由本线程置为 `false`）
/// - `metrics`: 指标
pub fn rx_loop(
    mut subscriber: impl Subscriber,
    ctx: Arc<ArmContext>,
    address: ArmAddress,
    config: PipelineConfig,
    is_running: Arc<AtomicBool>,
    metrics: Arc<DriverMetrics>,
) {
    let receive_timeout = Duration::from_millis(config.receive_timeout_ms);

    loop {
        // Acquire: If we see false, we must see all cleanup writes from other threads
        if !is_running.load(Ordering::Acquire) {
            trace!("RX thread: is_running flag is false, exiting");
            break;
        }

        let envelope = match subscriber.receive_timeout(receive_timeout) {
            Ok(envelope) => {
                metrics.notifications_received.fetch_add(1, Ordering::Relaxed);
                envelope
            },
            Err(TransportError::Timeout) => {
                metrics.receive_timeouts.fetch_add(1, Ordering::Relaxed);
                continue;
            },
            Err(TransportError::Disconnected) => {
                metrics.transport_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Notification stream disconnected, RX thread exiting");
                is_running.store(false, Ordering::Release);
                break;
            },
            Err(e) => {
                metrics.transport_errors.fetch_add(1, Ordering::Relaxed);
                error!("Notification receive error: {}", e);
                continue;
            },
        };

        if envelope.topic.address() != &address {
            metrics.notifications_foreign.fetch_add(1, Ordering::Relaxed);
            trace!("Ignoring notification for {}", envelope.topic);
            continue;
        }

        if !envelope.is_consistent() {
            metrics.notifications_rejected.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Rejected notification on {}: payload belongs to {}",
                envelope.topic,
                envelope.body.channel()
            );
            continue;
        }

        let channel = envelope.topic.channel();
        let seq = envelope.seq;
        match dispatch(&ctx, envelope) {
            Ok(Dispatch::Applied) => {
                metrics.notifications_applied.fetch_add(1, Ordering::Relaxed);
                trace!("Applied {} (seq={:?})", channel, seq);
            },
            Ok(Dispatch::Stale) => {
                metrics.notifications_stale.fetch_add(1, Ordering::Relaxed);
                debug!("Dropped stale {} (seq={:?})", channel, seq);
            },
            Err(e) => {
                metrics.notifications_rejected.fetch_add(1, Ordering::Relaxed);
                warn!("Rejected notification on {}: {}", channel, e);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvrk_messages::{ArmState, Channel, DEFAULT_NAMESPACE, JointState};
    use dvrk_transport::Transport;
    use dvrk_transport::loopback::loopback;
    use std::thread;
    use std::time::Instant;

    fn psm1() -> ArmAddress {
        ArmAddress::new(DEFAULT_NAMESPACE, "PSM1")
    }

    /// 等待条件成立（最多 1 秒）
    fn eventually(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(1);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn test_dispatch_routes_notifications() {
        let ctx = ArmContext::new();
        let address = psm1();

        let result = dispatch(
            &ctx,
            Envelope::notification(&address, Notification::RobotState(ArmState::Ready)),
        );
        assert_eq!(result.unwrap(), Dispatch::Applied);
        assert_eq!(ctx.robot_state(), ArmState::Ready);

        ctx.state_latch().begin_request();
        ctx.state_latch().begin_request();
        let stale = Envelope::notification(&address, Notification::RobotState(ArmState::Home))
            .with_seq(1);
        assert_eq!(dispatch(&ctx, stale).unwrap(), Dispatch::Stale);
        assert_eq!(ctx.robot_state(), ArmState::Ready);
    }

    #[test]
    fn test_rx_loop_filters_and_counts() {
        let (transport, bridge) = loopback();
        let (_publisher, subscriber) = transport.split().unwrap();
        let ctx = Arc::new(ArmContext::new());
        let metrics = Arc::new(DriverMetrics::new());
        let is_running = Arc::new(AtomicBool::new(true));

        let handle = {
            let (ctx, metrics, is_running) = (ctx.clone(), metrics.clone(), is_running.clone());
            thread::spawn(move || {
                rx_loop(subscriber, ctx, psm1(), PipelineConfig::default(), is_running, metrics)
            })
        };

        let notifier = bridge.notifier();
        let psm2 = ArmAddress::new(DEFAULT_NAMESPACE, "PSM2");
        // 其他机械臂
        notifier
            .notify_arm(&psm2, Notification::RobotState(ArmState::Ready), None)
            .unwrap();
        // 主题与内容不符
        notifier
            .notify(Envelope::new(
                psm1().topic(Channel::GoalReached),
                Notification::RobotState(ArmState::Ready),
            ))
            .unwrap();
        // 关节数量不符（先确定为 6，再发 7）
        notifier
            .notify_arm(&psm1(), Notification::JointDesired(JointState::zeros(6)), None)
            .unwrap();
        notifier
            .notify_arm(&psm1(), Notification::JointCurrent(JointState::zeros(7)), None)
            .unwrap();
        // 正常
        notifier
            .notify_arm(&psm1(), Notification::GoalReached(true), None)
            .unwrap();

        assert!(eventually(|| metrics.snapshot().notifications_applied == 2));
        assert!(ctx.goal_reached());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.notifications_received, 5);
        assert_eq!(snapshot.notifications_foreign, 1);
        assert_eq!(snapshot.notifications_rejected, 2);
        assert_eq!(ctx.robot_state(), ArmState::Uninitialized);
        assert_eq!(ctx.joint_count(), Some(6));

        is_running.store(false, Ordering::Release);
        handle.join().unwrap();
    }

    #[test]
    fn test_rx_loop_exits_on_disconnect() {
        let (transport, bridge) = loopback();
        let (_publisher, subscriber) = transport.split().unwrap();
        let is_running = Arc::new(AtomicBool::new(true));
        let handle = {
            let is_running = is_running.clone();
            thread::spawn(move || {
                rx_loop(
                    subscriber,
                    Arc::new(ArmContext::new()),
                    psm1(),
                    PipelineConfig::default(),
                    is_running,
                    Arc::new(DriverMetrics::new()),
                )
            })
        };

        drop(bridge);
        handle.join().unwrap();
        assert!(!is_running.load(Ordering::Acquire));
    }
}
