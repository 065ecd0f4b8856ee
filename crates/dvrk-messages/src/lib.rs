//! # dVRK Messages
//!
//! dVRK 机械臂中间件的消息定义（无传输依赖）
//!
//! ## 模块
//!
//! - `state`: 控制器离散状态（`ArmState`）
//! - `joint`: 关节状态（位置/速度/力矩）
//! - `geometry`: 笛卡尔位姿与力旋量
//! - `channel`: 命名通道与主题地址
//! - `message`: 出站命令与入站通知
//!
//! ## 主题地址
//!
//! 所有通道都以 `<namespace>/<arm-name>/<channel>` 形式寻址，例如
//! `/dvrk/PSM1/robot_state`。

pub mod channel;
pub mod error;
pub mod geometry;
pub mod joint;
pub mod message;
pub mod state;

pub use channel::{ArmAddress, Channel, Direction, Topic};
pub use error::MessageError;
pub use geometry::{Pose, Wrench};
pub use joint::JointState;
pub use message::{Command, Notification};
pub use state::ArmState;

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "/dvrk/";

/// 带主题和请求序号的消息信封
///
/// # 序号
///
/// - 出站命令：由会话层为需要确认的请求分配单调递增的序号
/// - 入站通知：支持回显序号的控制桥会携带触发该通知的请求序号；
///   不支持的传输层保持 `None`
///
/// 会话层据此丢弃"属于上一个请求"的过期通知。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope<T> {
    /// 完整主题
    pub topic: Topic,
    /// 请求序号（可选）
    pub seq: Option<u64>,
    /// 消息体
    pub body: T,
}

impl<T> Envelope<T> {
    /// 创建不带序号的信封
    pub fn new(topic: Topic, body: T) -> Self {
        Self {
            topic,
            seq: None,
            body,
        }
    }

    /// 附加请求序号
    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    /// 附加可选请求序号
    pub fn with_optional_seq(mut self, seq: Option<u64>) -> Self {
        self.seq = seq;
        self
    }
}

impl Envelope<Command> {
    /// 为指定机械臂地址封装命令（主题由命令类型推导）
    pub fn command(address: &ArmAddress, command: Command) -> Self {
        Envelope::new(address.topic(command.channel()), command)
    }

    /// 主题通道与消息体是否一致
    pub fn is_consistent(&self) -> bool {
        self.topic.channel() == self.body.channel()
    }
}

impl Envelope<Notification> {
    /// 为指定机械臂地址封装通知（主题由通知类型推导）
    pub fn notification(address: &ArmAddress, notification: Notification) -> Self {
        Envelope::new(address.topic(notification.channel()), notification)
    }

    /// 主题通道与消息体是否一致
    pub fn is_consistent(&self) -> bool {
        self.topic.channel() == self.body.channel()
    }
}
