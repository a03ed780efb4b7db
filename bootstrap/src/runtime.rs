//! 服务运行时

use config::{AppConfig, LogFormat};
use telemetry::{init_tracing, init_tracing_json};
use tracing::info;

/// 初始化运行时（日志）
pub fn init_runtime(config: &AppConfig) {
    match config.telemetry.log_format {
        LogFormat::Json => init_tracing_json(&config.telemetry.log_level),
        LogFormat::Text => init_tracing(&config.telemetry.log_level),
    }

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );
}
