//! # dVRK Transport Layer
//!
//! 中间件传输抽象层，将"主题 + 消息"的发布/订阅语义与具体中间件解耦。
//!
//! - [`Publisher`]：发布出站命令（不等待确认）
//! - [`Subscriber`]：带超时地接收入站通知
//! - [`Transport`]：可拆分为独立的发布端和订阅端，供驱动层的收发分离使用
//!
//! 进程内实现见 [`loopback`]；启用 `mock` feature 后，[`sim`] 提供一个
//! 运行在独立线程中的模拟控制桥。

use dvrk_messages::{Command, Envelope, Notification};
use std::time::Duration;
use thiserror::Error;

pub mod loopback;

#[cfg(feature = "mock")]
pub mod sim;

pub use loopback::{
    BridgeEndpoint, BridgeNotifier, LoopbackPublisher, LoopbackSubscriber, LoopbackTransport,
};

#[cfg(feature = "mock")]
pub use sim::{GoalBehavior, HomingBehavior, SimConfig, SimController};

/// 传输层统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 在超时时间内未收到消息
    #[error("Receive timeout")]
    Timeout,
    /// 对端已断开
    #[error("Transport disconnected")]
    Disconnected,
    /// 发送队列已满
    #[error("Send queue full")]
    Full,
    /// 后端错误
    #[error("Backend error: {0}")]
    Backend(String),
}

impl TransportError {
    /// 是否为致命错误（对端已不可用）
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::Disconnected)
    }
}

/// 出站命令发布端
pub trait Publisher {
    /// 发布一条命令，不等待任何确认
    fn publish(&mut self, envelope: Envelope<Command>) -> Result<(), TransportError>;
}

/// 入站通知订阅端
pub trait Subscriber {
    /// 阻塞接收，最多等待 `timeout`
    fn receive_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Envelope<Notification>, TransportError>;

    /// 非阻塞接收
    fn try_receive(&mut self) -> Result<Option<Envelope<Notification>>, TransportError> {
        match self.receive_timeout(Duration::ZERO) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(TransportError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// 可拆分的传输
///
/// 拆分后的两端分别移入驱动层的命令通道和接收线程。
pub trait Transport {
    type Publisher: Publisher + Send + 'static;
    type Subscriber: Subscriber + Send + 'static;

    fn split(self) -> Result<(Self::Publisher, Self::Subscriber), TransportError>;
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(&mut self, envelope: Envelope<Command>) -> Result<(), TransportError> {
        (**self).publish(envelope)
    }
}

impl<S: Subscriber + ?Sized> Subscriber for Box<S> {
    fn receive_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Envelope<Notification>, TransportError> {
        (**self).receive_timeout(timeout)
    }
}
