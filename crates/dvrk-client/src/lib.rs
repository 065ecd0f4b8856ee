//! # dVRK Client
//!
//! dVRK 机械臂的阻塞式会话接口。
//!
//! 控制桥（状态估计、轨迹生成、运动学）在外部运行；本 crate 发布命令、
//! 订阅通知，并把"请求 → 等待确认"封装为有超时上限的同步调用。
//!
//! ## 模块
//!
//! - `session`: 三种基本模式（确保状态、直接运动、目标运动）与归零/关闭
//! - `arm`: 参数校验与完整运动函数族
//! - `observer`: 只读状态访问
//! - `builder` / `config`: 构造与配置
//!
//! ## 线程模型
//!
//! 通知处理在驱动的接收线程上运行；本 crate 的所有阻塞方法都只能在
//! 前台线程调用。

mod arm;
mod builder;
mod config;
mod error;
pub mod joints;
pub mod observer;
pub mod session;
pub mod target;

pub use arm::Arm;
pub use builder::ArmBuilder;
pub use config::ArmConfig;
pub use error::{ArmError, Result};
pub use observer::Observer;
pub use session::{Session, Setpoint};
pub use target::{CartesianTarget, MotionMode};

pub use dvrk_driver::WrenchFrame;
