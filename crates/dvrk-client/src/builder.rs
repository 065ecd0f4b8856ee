//! Builder 模式实现
//!
//! 提供链式构造 [`Arm`] 实例的便捷方式。

use crate::arm::Arm;
use crate::config::ArmConfig;
use crate::error::{ArmError, Result};
use crate::session::Session;
use dvrk_driver::Driver;
use dvrk_messages::ArmAddress;
use dvrk_transport::Transport;
use tracing::info;

/// Arm Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use dvrk_client::{ArmBuilder, ArmConfig};
/// # fn example(transport: impl dvrk_transport::Transport) -> dvrk_client::Result<()> {
/// let arm = ArmBuilder::new("PSM1")
///     .namespace("/remote/")
///     .config(ArmConfig::default())
///     .require_feedback(true)
///     .connect(transport)?;
/// arm.home()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArmBuilder {
    /// 机械臂名称（如 `PSM1`、`MTML`、`ECM`）
    name: String,
    /// 覆盖配置中的命名空间
    namespace: Option<String>,
    config: ArmConfig,
    /// 连接时是否等待首个关节状态
    require_feedback: bool,
}

impl ArmBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            config: ArmConfig::default(),
            require_feedback: false,
        }
    }

    /// 设置命名空间（覆盖配置）
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 设置会话配置
    pub fn config(mut self, config: ArmConfig) -> Self {
        self.config = config;
        self
    }

    /// 连接时等待首个关节状态（超时为 `feedback_timeout_ms`）
    pub fn require_feedback(mut self, require: bool) -> Self {
        self.require_feedback = require;
        self
    }

    /// 在给定传输上建立会话
    pub fn connect<T: Transport>(self, transport: T) -> Result<Arm> {
        let mut config = self.config;
        if let Some(namespace) = self.namespace {
            config.namespace = namespace;
        }
        config.validate()?;

        let name = self.name.trim();
        if name.is_empty() || name.contains('/') {
            return Err(ArmError::Config(format!("invalid arm name '{}'", self.name)));
        }

        let address = ArmAddress::new(&config.namespace, name);
        let driver = Driver::new(address.clone(), transport, config.pipeline_config())?;
        let feedback_timeout = config.feedback_timeout();
        let arm = Arm::new(Session::new(driver, config));

        if self.require_feedback {
            let joints = arm.wait_for_feedback(feedback_timeout)?;
            info!("{}: connected ({} joints)", address, joints);
        } else {
            info!("{}: connected", address);
        }
        Ok(arm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvrk_driver::DriverError;
    use dvrk_transport::loopback::loopback;

    #[test]
    fn test_namespace_override() {
        let (transport, _bridge) = loopback();
        let arm = ArmBuilder::new("PSM2")
            .namespace("remote")
            .connect(transport)
            .unwrap();
        assert_eq!(arm.address().to_string(), "/remote/PSM2");
        assert_eq!(arm.name(), "PSM2");
    }

    #[test]
    fn test_invalid_name_rejected() {
        let (transport, _bridge) = loopback();
        assert!(matches!(
            ArmBuilder::new("PSM1/extra").connect(transport),
            Err(ArmError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (transport, _bridge) = loopback();
        let config = ArmConfig {
            home_attempts: 0,
            ..ArmConfig::default()
        };
        assert!(matches!(
            ArmBuilder::new("PSM1").config(config).connect(transport),
            Err(ArmError::Config(_))
        ));
    }

    #[test]
    fn test_require_feedback_times_out() {
        let (transport, _bridge) = loopback();
        let config = ArmConfig {
            feedback_timeout_ms: 20,
            ..ArmConfig::default()
        };
        let result = ArmBuilder::new("PSM1")
            .config(config)
            .require_feedback(true)
            .connect(transport);
        assert!(matches!(result, Err(ArmError::Driver(DriverError::Timeout))));
    }
}
