//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use dvrk_sdk::prelude::*;
//! ```

// 客户端层
pub use crate::client::{
    Arm, ArmBuilder, ArmConfig, ArmError, CartesianTarget, MotionMode, Observer, WrenchFrame,
};

// 消息层
pub use crate::messages::{ArmAddress, ArmState, DEFAULT_NAMESPACE, JointState, Pose, Wrench};

// 传输层（常用 Trait）
pub use crate::transport::{Publisher, Subscriber, Transport};

// 几何
pub use nalgebra::{UnitQuaternion, Vector3};

// 错误类型
pub use crate::driver::DriverError;
pub use crate::transport::TransportError;
