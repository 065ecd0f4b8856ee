//! 进程内回环总线
//!
//! 使用 crossbeam channel 连接客户端与控制桥两端：
//!
//! ```text
//! LoopbackTransport ──Envelope<Command>──▶ BridgeEndpoint
//!        ▲                                      │
//!        └──────Envelope<Notification>──────────┘
//! ```
//!
//! 客户端一侧实现 [`Transport`]，控制桥一侧（测试脚本或 [`crate::sim`]）
//! 持有 [`BridgeEndpoint`] 读取命令并发布通知。

use crate::{Publisher, Subscriber, Transport, TransportError};
use crossbeam_channel::{
    Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError, bounded, unbounded,
};
use dvrk_messages::{ArmAddress, Command, Envelope, Notification};
use std::time::Duration;

/// 创建无界回环总线
pub fn loopback() -> (LoopbackTransport, BridgeEndpoint) {
    let (cmd_tx, cmd_rx) = unbounded();
    let (notify_tx, notify_rx) = unbounded();
    build(cmd_tx, cmd_rx, notify_tx, notify_rx)
}

/// 创建有界回环总线（命令队列满时发布返回 [`TransportError::Full`]）
pub fn loopback_bounded(capacity: usize) -> (LoopbackTransport, BridgeEndpoint) {
    let (cmd_tx, cmd_rx) = bounded(capacity);
    let (notify_tx, notify_rx) = bounded(capacity);
    build(cmd_tx, cmd_rx, notify_tx, notify_rx)
}

fn build(
    cmd_tx: Sender<Envelope<Command>>,
    cmd_rx: Receiver<Envelope<Command>>,
    notify_tx: Sender<Envelope<Notification>>,
    notify_rx: Receiver<Envelope<Notification>>,
) -> (LoopbackTransport, BridgeEndpoint) {
    (
        LoopbackTransport {
            publisher: LoopbackPublisher { tx: cmd_tx },
            subscriber: LoopbackSubscriber { rx: notify_rx },
        },
        BridgeEndpoint {
            commands: cmd_rx,
            notifier: BridgeNotifier { tx: notify_tx },
        },
    )
}

/// 客户端一侧
pub struct LoopbackTransport {
    publisher: LoopbackPublisher,
    subscriber: LoopbackSubscriber,
}

impl Transport for LoopbackTransport {
    type Publisher = LoopbackPublisher;
    type Subscriber = LoopbackSubscriber;

    fn split(self) -> Result<(Self::Publisher, Self::Subscriber), TransportError> {
        Ok((self.publisher, self.subscriber))
    }
}

/// 命令发布端
pub struct LoopbackPublisher {
    tx: Sender<Envelope<Command>>,
}

impl Publisher for LoopbackPublisher {
    fn publish(&mut self, envelope: Envelope<Command>) -> Result<(), TransportError> {
        self.tx.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Full,
            TrySendError::Disconnected(_) => TransportError::Disconnected,
        })
    }
}

/// 通知订阅端
pub struct LoopbackSubscriber {
    rx: Receiver<Envelope<Notification>>,
}

impl Subscriber for LoopbackSubscriber {
    fn receive_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Envelope<Notification>, TransportError> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => TransportError::Timeout,
            RecvTimeoutError::Disconnected => TransportError::Disconnected,
        })
    }

    fn try_receive(&mut self) -> Result<Option<Envelope<Notification>>, TransportError> {
        match self.rx.try_recv() {
            Ok(envelope) => Ok(Some(envelope)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}

/// 控制桥一侧
pub struct BridgeEndpoint {
    commands: Receiver<Envelope<Command>>,
    notifier: BridgeNotifier,
}

impl BridgeEndpoint {
    /// 等待下一条命令
    pub fn recv_command_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Envelope<Command>, TransportError> {
        self.commands.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => TransportError::Timeout,
            RecvTimeoutError::Disconnected => TransportError::Disconnected,
        })
    }

    /// 取出当前已排队的全部命令
    pub fn drain_commands(&self) -> Vec<Envelope<Command>> {
        self.commands.try_iter().collect()
    }

    /// 发布通知
    pub fn notify(&self, envelope: Envelope<Notification>) -> Result<(), TransportError> {
        self.notifier.notify(envelope)
    }

    /// 可跨线程克隆的通知发布句柄
    pub fn notifier(&self) -> BridgeNotifier {
        self.notifier.clone()
    }
}

/// 通知发布句柄
#[derive(Clone)]
pub struct BridgeNotifier {
    tx: Sender<Envelope<Notification>>,
}

impl BridgeNotifier {
    /// 发布通知
    pub fn notify(&self, envelope: Envelope<Notification>) -> Result<(), TransportError> {
        self.tx.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Full,
            TrySendError::Disconnected(_) => TransportError::Disconnected,
        })
    }

    /// 为指定机械臂发布通知（主题由通知类型推导）
    pub fn notify_arm(
        &self,
        address: &ArmAddress,
        notification: Notification,
        seq: Option<u64>,
    ) -> Result<(), TransportError> {
        self.notify(Envelope::notification(address, notification).with_optional_seq(seq))
    }
}
