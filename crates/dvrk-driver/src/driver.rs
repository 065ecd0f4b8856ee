//! 机械臂驱动
//!
//! [`Driver`] 拥有一个机械臂会话的全部底层资源：
//! - 接收线程（运行 [`rx_loop`]，所有通知处理函数都在其中执行）
//! - 命令通道（前台线程直接发布，无独立发送线程）
//! - 共享状态上下文与指标

use crate::command::CommandChannel;
use crate::error::DriverError;
use crate::metrics::{DriverMetrics, MetricsSnapshot};
use crate::pipeline::{PipelineConfig, rx_loop};
use crate::state::ArmContext;
use dvrk_messages::ArmAddress;
use dvrk_transport::Transport;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{JoinHandle, spawn};
use std::time::Duration;
use tracing::{error, info};

/// 带超时的线程 join
trait JoinTimeout {
    fn join_timeout(self, timeout: Duration) -> std::thread::Result<()>;
}

impl<T: Send + 'static> JoinTimeout for JoinHandle<T> {
    fn join_timeout(self, timeout: Duration) -> std::thread::Result<()> {
        use std::sync::mpsc;

        let (tx, rx) = mpsc::channel();
        // 看门狗线程代为 join，超时后继续在后台运行
        spawn(move || {
            let result = self.join();
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(join_result) => join_result.map(|_| ()),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Thread join timeout",
            ))),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "Thread panicked during join",
            ))),
        }
    }
}

/// 单个机械臂的驱动
pub struct Driver {
    address: ArmAddress,
    ctx: Arc<ArmContext>,
    commands: CommandChannel,
    metrics: Arc<DriverMetrics>,
    is_running: Arc<AtomicBool>,
    rx_thread: Option<JoinHandle<()>>,
    config: PipelineConfig,
}

impl Driver {
    /// 拆分传输并启动接收线程
    pub fn new<T: Transport>(
        address: ArmAddress,
        transport: T,
        config: PipelineConfig,
    ) -> Result<Self, DriverError> {
        let (publisher, subscriber) = transport.split()?;

        let ctx = Arc::new(ArmContext::new());
        let metrics = Arc::new(DriverMetrics::new());
        let is_running = Arc::new(AtomicBool::new(true));

        let rx_thread = {
            let ctx = ctx.clone();
            let metrics = metrics.clone();
            let is_running = is_running.clone();
            let address = address.clone();
            let config = config.clone();
            std::thread::Builder::new()
                .name(format!("dvrk-rx-{}", address.arm()))
                .spawn(move || rx_loop(subscriber, ctx, address, config, is_running, metrics))?
        };

        info!("Driver started for {}", address);

        Ok(Self {
            commands: CommandChannel::new(address.clone(), Box::new(publisher), metrics.clone()),
            address,
            ctx,
            metrics,
            is_running,
            rx_thread: Some(rx_thread),
            config,
        })
    }

    /// 机械臂地址
    pub fn address(&self) -> &ArmAddress {
        &self.address
    }

    /// 共享状态上下文
    pub fn context(&self) -> &Arc<ArmContext> {
        &self.ctx
    }

    /// 命令通道
    pub fn commands(&self) -> &CommandChannel {
        &self.commands
    }

    /// 指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 接收线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// 等待接收到第一条关节状态（关节数量确定）
    ///
    /// 返回关节数量；超时返回 [`DriverError::Timeout`]。
    pub fn wait_for_feedback(&self, timeout: Duration) -> Result<usize, DriverError> {
        self.ctx
            .wait_for_joint_count(timeout)
            .ok_or(DriverError::Timeout)
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.is_running.store(false, Ordering::Release);

        let join_timeout = Duration::from_millis(self.config.join_timeout_ms);
        if let Some(handle) = self.rx_thread.take()
            && let Err(_e) = handle.join_timeout(join_timeout)
        {
            error!(
                "RX thread panicked or failed to shut down within {:?}",
                join_timeout
            );
        }
        info!("Driver stopped for {}", self.address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvrk_messages::{ArmState, DEFAULT_NAMESPACE};
    use dvrk_transport::{SimConfig, SimController};
    use std::time::Instant;

    fn psm1() -> ArmAddress {
        ArmAddress::new(DEFAULT_NAMESPACE, "PSM1")
    }

    #[test]
    fn test_wait_for_feedback_from_sim() {
        let (transport, _sim) =
            SimController::launch(psm1(), SimConfig::default().with_joint_count(7));
        let driver = Driver::new(psm1(), transport, PipelineConfig::default()).unwrap();

        assert_eq!(driver.wait_for_feedback(Duration::from_secs(2)).unwrap(), 7);
        assert!(driver.is_running());
        assert!(driver.metrics().notifications_applied > 0);
    }

    #[test]
    fn test_wait_for_feedback_timeout() {
        let config = SimConfig {
            publish_initial_state: false,
            ..SimConfig::default()
        };
        let (transport, _sim) = SimController::launch(psm1(), config);
        let driver = Driver::new(psm1(), transport, PipelineConfig::default()).unwrap();

        let start = Instant::now();
        assert!(matches!(
            driver.wait_for_feedback(Duration::from_millis(30)),
            Err(DriverError::Timeout)
        ));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_command_roundtrip_through_sim() {
        let (transport, sim) = SimController::launch(psm1(), SimConfig::default());
        let driver = Driver::new(psm1(), transport, PipelineConfig::default()).unwrap();

        let seq = driver.context().state_latch().begin_request();
        driver.commands().request_state(ArmState::Ready, Some(seq));

        let latch = driver.context().state_latch();
        let deadline = Instant::now() + Duration::from_secs(1);
        while driver.context().robot_state() != ArmState::Ready && Instant::now() < deadline {
            latch.wait(Duration::from_millis(10));
        }
        assert_eq!(driver.context().robot_state(), ArmState::Ready);
        assert_eq!(sim.state(), ArmState::Ready);
        assert_eq!(driver.metrics().commands_sent, 1);
    }

    #[test]
    fn test_drop_stops_rx_thread() {
        let (transport, _sim) = SimController::launch(psm1(), SimConfig::default());
        let driver = Driver::new(psm1(), transport, PipelineConfig::default()).unwrap();
        let start = Instant::now();
        drop(driver);
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
