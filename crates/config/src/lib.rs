//! config - 配置加载库
//!
//! 加载顺序：`{dir}/default.toml` → `{dir}/{APP_ENV}.toml` → `APP_` 前缀环境变量
//! （嵌套字段用 `__` 分隔，例如 `APP_DSQL__HOST`）。

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

/// DSQL 令牌的最长有效期（一周）
pub const MAX_TOKEN_TTL_SECS: u64 = 604_800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// DSQL 集群与身份配置
#[derive(Debug, Clone, Deserialize)]
pub struct DsqlConfig {
    /// 集群端点，例如 `xxxx.dsql.us-east-1.on.aws`
    pub host: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// 本地 AWS 凭证 profile
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_token_ttl_secs() -> u64 {
    86_400
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_name")]
    pub name: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 静态密码（仅本地开发使用；设置后不再申请令牌）
    #[serde(default)]
    pub password: Option<Secret<String>>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_pool_min")]
    pub pool_min: u32,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub application_name: Option<String>,
    /// 连接后的 search_path
    #[serde(default)]
    pub schema: Option<String>,
}

fn default_database_name() -> String {
    "postgres".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_pool_size() -> u32 {
    10
}

fn default_pool_min() -> u32 {
    1
}

fn default_ssl_mode() -> String {
    "require".to_string()
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: default_database_name(),
            username: default_username(),
            port: default_port(),
            password: None,
            pool_size: default_pool_size(),
            pool_min: default_pool_min(),
            ssl_mode: default_ssl_mode(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            application_name: None,
            schema: None,
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    pub app_env: String,
    pub dsql: DsqlConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_name() -> String {
    "product-crud".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::from(Serialized::default("app_env", &env))
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dsql.host.trim().is_empty() {
            return Err(ConfigError::Invalid("dsql.host must not be empty".to_string()));
        }
        if self.dsql.region.trim().is_empty() {
            return Err(ConfigError::Invalid("dsql.region must not be empty".to_string()));
        }
        if self.dsql.token_ttl_secs == 0 || self.dsql.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "dsql.token_ttl_secs must be within 1..={}, got {}",
                MAX_TOKEN_TTL_SECS, self.dsql.token_ttl_secs
            )));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::Invalid("database.pool_size must be at least 1".to_string()));
        }
        if self.database.pool_min > self.database.pool_size {
            return Err(ConfigError::Invalid(format!(
                "database.pool_min ({}) exceeds database.pool_size ({})",
                self.database.pool_min, self.database.pool_size
            )));
        }
        Ok(())
    }
}
