//! dVRK SDK - dVRK 机械臂 Rust SDK
//!
//! 通过发布/订阅控制桥驱动 dVRK 机械臂（PSM、MTM、ECM）的阻塞式客户端。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **消息层** (`messages`): 状态名、关节状态、位姿、力旋量、主题命名
//! - **传输层** (`transport`): 发布/订阅抽象，回环总线，模拟控制桥
//! - **驱动层** (`driver`): 接收线程、状态缓存、事件锁存、命令通道
//! - **客户端层** (`client`): 确保状态、直接运动、目标运动、归零、力控
//!
//! # 快速开始
//!
//! 大多数用户应该使用客户端接口：
//!
//! ```rust
//! use dvrk_sdk::prelude::*;
//! // 或
//! use dvrk_sdk::{Arm, ArmBuilder, Observer};
//! ```
//!
//! 需要直接处理通知或命令的用户可以使用驱动层：
//!
//! ```rust
//! use dvrk_sdk::driver::{ArmContext, CommandChannel, Driver};
//! ```

pub use dvrk_client as client;
pub use dvrk_driver as driver;
pub use dvrk_messages as messages;
pub use dvrk_transport as transport;

pub mod logging;
pub mod prelude;

// 客户端层（推荐入口）
pub use client::{
    Arm, ArmBuilder, ArmConfig, ArmError, CartesianTarget, MotionMode, Observer, Result, Session,
    Setpoint, WrenchFrame,
};

// 消息层常用类型
pub use messages::{ArmAddress, ArmState, JointState, Pose, Wrench};

// 传输层
pub use transport::{Transport, TransportError};

// 驱动层错误（驱动本身通过 `driver::Driver` 访问）
pub use driver::DriverError;

pub use logging::{init_logging, try_init_logging};
