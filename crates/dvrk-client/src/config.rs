//! 会话配置
//!
//! 默认值与 dVRK 控制桥的行为匹配：状态转换 5 秒，关闭 20 秒，
//! 目标运动 20 秒，归零 10 次 × 20 秒。
//!
//! ```toml
//! namespace = "/dvrk/"
//! state_timeout_ms = 5000
//! goal_timeout_ms = 20000
//! home_attempts = 10
//! ```

use crate::error::{ArmError, Result};
use dvrk_driver::PipelineConfig;
use dvrk_messages::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 会话配置
///
/// 所有字段都可以在 TOML 中省略，省略时使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmConfig {
    /// 主题命名空间
    pub namespace: String,
    /// 状态转换超时（毫秒）
    pub state_timeout_ms: u64,
    /// 关闭（进入 `DVRK_UNINITIALIZED`）超时（毫秒）
    pub shutdown_timeout_ms: u64,
    /// 目标运动超时（毫秒）
    pub goal_timeout_ms: u64,
    /// 归零每次等待的超时（毫秒）
    pub home_attempt_timeout_ms: u64,
    /// 归零最多等待次数
    pub home_attempts: u32,
    /// 连接时等待首个关节状态的超时（毫秒）
    pub feedback_timeout_ms: u64,
    /// 接收线程轮询超时（毫秒）
    pub receive_timeout_ms: u64,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            state_timeout_ms: 5_000,
            shutdown_timeout_ms: 20_000,
            goal_timeout_ms: 20_000,
            home_attempt_timeout_ms: 20_000,
            home_attempts: 10,
            feedback_timeout_ms: 5_000,
            receive_timeout_ms: 10,
        }
    }
}

impl ArmConfig {
    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ArmConfig =
            toml::from_str(content).map_err(|e| ArmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArmError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ArmError::Config(e.to_string()))
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim_matches('/').is_empty() {
            return Err(ArmError::Config("namespace must not be empty".to_string()));
        }
        if self.home_attempts == 0 {
            return Err(ArmError::Config("home_attempts must be at least 1".to_string()));
        }
        if self.receive_timeout_ms == 0 {
            return Err(ArmError::Config("receive_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn state_timeout(&self) -> Duration {
        Duration::from_millis(self.state_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn goal_timeout(&self) -> Duration {
        Duration::from_millis(self.goal_timeout_ms)
    }

    pub fn home_attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.home_attempt_timeout_ms)
    }

    pub fn feedback_timeout(&self) -> Duration {
        Duration::from_millis(self.feedback_timeout_ms)
    }

    /// 驱动层 Pipeline 配置
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            receive_timeout_ms: self.receive_timeout_ms,
            ..PipelineConfig::default()
        }
    }
}
