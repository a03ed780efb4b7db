//! PostgreSQL 配置模块
//!
//! 连接池、SSL 与连接 URL 的组装。密码（通常是短期令牌）始终以 `Secret` 保存。

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use errors::AppError;
use secrecy::{ExposeSecret, Secret};

/// SSL 模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    /// 禁用 SSL
    Disable,
    /// 允许 SSL（如果服务器支持）
    Prefer,
    /// 要求 SSL
    #[default]
    Require,
    /// 验证 CA 证书
    VerifyCa,
    /// 验证完整证书链
    VerifyFull,
}

impl SslMode {
    /// 转换为 sqlx 的 SSL 模式字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" | "verify_ca" => Ok(SslMode::VerifyCa),
            "verify-full" | "verify_full" => Ok(SslMode::VerifyFull),
            other => Err(AppError::config(format!("Unknown ssl mode: {}", other))),
        }
    }
}

/// PostgreSQL 配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// 数据库 URL（可能包含密码）
    url: Secret<String>,
    /// 主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 数据库名
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码或令牌
    password: Option<Secret<String>>,
    /// Schema
    pub schema: Option<String>,
    /// SSL 模式
    pub ssl_mode: SslMode,

    // 连接池配置
    /// 最小连接数
    pub pool_min: u32,
    /// 最大连接数（固定上限，不允许溢出）
    pub pool_max: u32,
    /// 获取连接超时
    pub acquire_timeout: Duration,
    /// 空闲超时
    pub idle_timeout: Duration,
    /// 连接最大生命周期
    pub max_lifetime: Option<Duration>,

    /// 应用名称（用于连接标识）
    pub application_name: Option<String>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: Secret::new(String::new()),
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            username: "postgres".to_string(),
            password: None,
            schema: None,
            ssl_mode: SslMode::default(),
            pool_min: 1,
            pool_max: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Some(Duration::from_secs(1800)),
            application_name: None,
        }
    }
}

impl PostgresConfig {
    /// 从完整 URL 创建配置
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Secret::new(url.into()),
            ..Default::default()
        }
    }

    /// 从组件创建配置
    pub fn from_components(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let mut config = Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            ..Default::default()
        };
        config.rebuild_url();
        config
    }

    /// 设置密码（令牌作为密码使用）
    pub fn with_password(mut self, password: Secret<String>) -> Self {
        self.password = Some(password);
        self.rebuild_url();
        self
    }

    /// 设置 Schema
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// 设置 SSL 模式
    pub fn with_ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    /// 设置连接池配置
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.pool_min = min;
        self.pool_max = max;
        self
    }

    /// 设置获取连接超时
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// 设置应用名称
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// 是否设置了密码
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// 重建 URL，用户名和密码做百分号编码（令牌中含有 `&`、`=`、`/`）
    fn rebuild_url(&mut self) {
        let password_part = self
            .password
            .as_ref()
            .map(|p| format!(":{}@", urlencoding::encode(p.expose_secret())))
            .unwrap_or_else(|| "@".to_string());

        self.url = Secret::new(format!(
            "postgres://{}{}{}:{}/{}",
            urlencoding::encode(&self.username),
            password_part,
            self.host,
            self.port,
            self.database
        ));
    }

    /// 获取带 SSL 参数的连接 URL
    pub fn connection_url(&self) -> Secret<String> {
        let mut url = self.url.expose_secret().clone();
        let mut params = Vec::new();

        params.push(format!("sslmode={}", self.ssl_mode.as_str()));

        if let Some(ref app_name) = self.application_name {
            params.push(format!("application_name={}", urlencoding::encode(app_name)));
        }

        if let Some(ref schema) = self.schema {
            params.push(format!(
                "options=--search_path%3D{}",
                urlencoding::encode(schema)
            ));
        }

        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&params.join("&"));

        Secret::new(url)
    }
}
