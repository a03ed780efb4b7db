//! 基础设施资源管理
//!
//! 启动阶段任何一步失败都直接返回错误，由调用方终止进程，不做重试。

use std::time::Duration;

use adapter_dsql::{AuthTokenProvider, DsqlAuthConfig, DsqlAuthConfigBuilder, DsqlTokenGenerator};
use adapter_postgres::{PostgresConfig, SslMode, close_pool, create_pool, verify_pool};
use config::AppConfig;
use errors::AppResult;
use secrecy::Secret;
use sqlx::PgPool;
use tracing::info;

/// 基础设施资源容器
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 配置了静态密码时直接使用，否则通过 AWS 凭证申请 DSQL 令牌。
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        if let Some(password) = config.database.password.clone() {
            info!("Using static database password, skipping token generation");
            return Self::connect(config, password).await;
        }

        let auth = dsql_auth_config(&config);
        let generator = DsqlTokenGenerator::new(&auth).await;
        Self::with_token_provider(config, &generator).await
    }

    /// 使用给定的令牌提供者申请令牌并建立连接
    pub async fn with_token_provider(
        config: AppConfig,
        provider: &dyn AuthTokenProvider,
    ) -> AppResult<Self> {
        let request = dsql_auth_config(&config).token_request();
        let token = provider.generate_token(&request).await?;
        info!(expires_at = %token.expires_at(), "Database auth token acquired");

        Self::connect(config, token.secret().clone()).await
    }

    async fn connect(config: AppConfig, password: Secret<String>) -> AppResult<Self> {
        let pg_config = postgres_config(&config, password)?;
        let postgres_pool = verify_pool(create_pool(&pg_config).await?).await?;

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 关闭所有资源
    pub async fn shutdown(&self) {
        close_pool(&self.postgres_pool).await;
    }
}

/// 由应用配置生成令牌配置
pub fn dsql_auth_config(config: &AppConfig) -> DsqlAuthConfig {
    DsqlAuthConfigBuilder::new(&config.dsql.host)
        .with_region(&config.dsql.region)
        .with_profile(&config.dsql.profile)
        .with_username(&config.database.username)
        .with_expires_in(config.dsql.token_ttl_secs)
        .build()
}

/// 由应用配置和密码（令牌）生成连接池配置
pub fn postgres_config(config: &AppConfig, password: Secret<String>) -> AppResult<PostgresConfig> {
    let db = &config.database;
    let ssl_mode: SslMode = db.ssl_mode.parse()?;

    let mut pg_config =
        PostgresConfig::from_components(&config.dsql.host, db.port, &db.name, &db.username)
            .with_password(password)
            .with_ssl_mode(ssl_mode)
            .with_pool(db.pool_min, db.pool_size)
            .with_acquire_timeout(Duration::from_secs(db.acquire_timeout_secs));

    if let Some(ref app_name) = db.application_name {
        pg_config = pg_config.with_application_name(app_name);
    }
    if let Some(ref schema) = db.schema {
        pg_config = pg_config.with_schema(schema);
    }

    Ok(pg_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use adapter_dsql::{AuthToken, TokenKind, TokenRequest};
    use async_trait::async_trait;
    use config::{DatabaseConfig, DsqlConfig, TelemetryConfig};
    use errors::AppError;
    use mockall::mock;
    use secrecy::ExposeSecret;

    mock! {
        pub TokenProvider {}

        #[async_trait]
        impl AuthTokenProvider for TokenProvider {
            async fn generate_token(&self, request: &TokenRequest) -> AppResult<AuthToken>;
        }
    }

    fn app_config() -> AppConfig {
        AppConfig {
            app_name: "product-crud".to_string(),
            app_env: "test".to_string(),
            dsql: DsqlConfig {
                host: "abc.dsql.us-east-1.on.aws".to_string(),
                region: "us-east-1".to_string(),
                profile: "default".to_string(),
                token_ttl_secs: 86_400,
            },
            database: DatabaseConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_dsql_auth_config_from_app_config() {
        let auth = dsql_auth_config(&app_config());
        let request = auth.token_request();

        assert_eq!(request.hostname, "abc.dsql.us-east-1.on.aws");
        assert_eq!(request.region, "us-east-1");
        assert_eq!(request.expires_in, Duration::from_secs(86_400));
        assert_eq!(request.kind, TokenKind::Admin);
    }

    #[test]
    fn test_non_admin_role_requests_regular_token() {
        let mut config = app_config();
        config.database.username = "app_user".to_string();

        assert_eq!(dsql_auth_config(&config).token_kind(), TokenKind::Regular);
    }

    #[test]
    fn test_postgres_config_from_app_config() {
        let pg_config =
            postgres_config(&app_config(), Secret::new("token-value".to_string())).unwrap();

        assert_eq!(pg_config.host, "abc.dsql.us-east-1.on.aws");
        assert_eq!(pg_config.database, "postgres");
        assert_eq!(pg_config.username, "admin");
        assert_eq!(pg_config.ssl_mode, SslMode::Require);
        assert_eq!(pg_config.pool_max, 10);
        assert!(pg_config.has_password());

        let url = pg_config.connection_url();
        assert!(url.expose_secret().contains("admin:token-value@abc.dsql.us-east-1.on.aws:5432/postgres"));
        assert!(url.expose_secret().ends_with("sslmode=require"));
    }

    #[test]
    fn test_postgres_config_applies_schema() {
        let mut config = app_config();
        config.database.schema = Some("inventory".to_string());
        config.database.application_name = Some("product-crud".to_string());

        let pg_config = postgres_config(&config, Secret::new("t".to_string())).unwrap();
        assert_eq!(pg_config.schema.as_deref(), Some("inventory"));

        let url = pg_config.connection_url();
        let url = url.expose_secret();
        assert!(url.contains("application_name=product-crud"));
        assert!(url.ends_with("options=--search_path%3Dinventory"));
    }

    #[test]
    fn test_postgres_config_rejects_unknown_ssl_mode() {
        let mut config = app_config();
        config.database.ssl_mode = "sometimes".to_string();

        let result = postgres_config(&config, Secret::new("t".to_string()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_token_failure_aborts_startup() {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_generate_token()
            .times(1)
            .returning(|_| Err(AppError::external_service("identity service unavailable")));

        let result = Infrastructure::with_token_provider(app_config(), &provider).await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_token_request_matches_config() {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_generate_token()
            .withf(|request| {
                request.hostname == "abc.dsql.us-east-1.on.aws"
                    && request.expires_in == Duration::from_secs(86_400)
                    && request.kind == TokenKind::Admin
            })
            .times(1)
            .returning(|_| Err(AppError::unauthenticated("no credentials")));

        let result = Infrastructure::with_token_provider(app_config(), &provider).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
