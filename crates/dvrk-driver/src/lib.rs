//! # dVRK Driver
//!
//! 单个 dVRK 机械臂会话的底层驱动：
//! - 事件锁存器（电平触发 + 请求序号）
//! - 状态跟踪（ArcSwap 无锁读取）
//! - 通知接收线程（主题过滤与分发）
//! - 命令通道（一次性、非阻塞）
//!
//! 大多数用户应该使用 `dvrk-client` 提供的阻塞式会话接口。

mod driver;
mod error;
pub mod command;
pub mod latch;
pub mod metrics;
pub mod pipeline;
pub mod state;

pub use command::{CommandChannel, WrenchFrame};
pub use driver::Driver;
pub use error::DriverError;
pub use latch::EventLatch;
pub use metrics::{DriverMetrics, MetricsSnapshot};
pub use pipeline::{Dispatch, PipelineConfig, dispatch, rx_loop};
pub use state::ArmContext;
