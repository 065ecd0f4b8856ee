//! 日志初始化
//!
//! 安装全局 `tracing` 订阅者，并把 `log` 宏的记录转发到 `tracing`。
//! 过滤规则优先读取 `RUST_LOG`，未设置时使用调用方给出的默认指令。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// 默认过滤指令
pub const DEFAULT_DIRECTIVE: &str = "dvrk=info";

/// `dvrk` 前缀覆盖的 crate
const DVRK_CRATES: [&str; 5] = [
    "dvrk_messages",
    "dvrk_transport",
    "dvrk_driver",
    "dvrk_client",
    "dvrk_sdk",
];

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    /// 过滤指令无法解析
    #[error("Invalid log directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    /// 已经安装过全局订阅者或 `log` 转发
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// 构造过滤器：`RUST_LOG` 优先，否则使用 `directive`
///
/// `dvrk` 前缀会展开为所有 `dvrk_*` crate。
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let expanded = expand_directive(directive);
    EnvFilter::try_new(&expanded).map_err(|e| LoggingError::InvalidDirective {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

fn expand_directive(directive: &str) -> String {
    directive
        .split(',')
        .flat_map(|part| {
            let part = part.trim();
            match part.split_once('=') {
                Some(("dvrk", level)) => DVRK_CRATES
                    .iter()
                    .map(|krate| format!("{krate}={level}"))
                    .collect::<Vec<_>>(),
                _ => vec![part.to_string()],
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// 安装全局日志订阅者
pub fn try_init_logging(directive: &str) -> Result<(), LoggingError> {
    let filter = build_filter(directive)?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .finish();

    tracing_log::LogTracer::init().map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// 使用默认指令安装全局日志订阅者（重复调用时静默忽略）
pub fn init_logging() {
    if let Err(e) = try_init_logging(DEFAULT_DIRECTIVE) {
        tracing::debug!("Logging not initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_directive() {
        assert_eq!(
            expand_directive("dvrk=debug"),
            "dvrk_messages=debug,dvrk_transport=debug,dvrk_driver=debug,dvrk_client=debug,dvrk_sdk=debug"
        );
        assert_eq!(expand_directive("warn, dvrk_client=trace"), "warn,dvrk_client=trace");
        assert_eq!(expand_directive(""), "");
    }

    #[test]
    fn test_invalid_directive() {
        // RUST_LOG 设置时优先使用环境变量，此时跳过
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            build_filter("dvrk_client=loud"),
            Err(LoggingError::InvalidDirective { .. })
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let _ = try_init_logging("info");
        assert!(matches!(
            try_init_logging("info"),
            Err(LoggingError::AlreadyInitialized(_))
        ));
        init_logging();
    }
}
