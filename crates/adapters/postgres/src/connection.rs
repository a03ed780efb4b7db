//! PostgreSQL 连接管理

use errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::config::PostgresConfig;

/// 创建 PostgreSQL 连接池
///
/// 池容量固定为 `pool_max`，连接在首次使用时按需建立。
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    let mut options = PgPoolOptions::new()
        .max_connections(config.pool_max)
        .min_connections(config.pool_min)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout);

    if let Some(lifetime) = config.max_lifetime {
        options = options.max_lifetime(lifetime);
    }

    let pool = options
        .connect(config.connection_url().expose_secret())
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))?;

    info!(
        host = %config.host,
        database = %config.database,
        ssl_mode = %config.ssl_mode,
        max_connections = config.pool_max,
        "PostgreSQL connection pool created"
    );

    Ok(pool)
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    debug!("Database connection verified");
    Ok(())
}

/// 检查数据库连接，失败时先关闭连接池再返回错误
pub async fn verify_pool(pool: PgPool) -> AppResult<PgPool> {
    if let Err(e) = check_connection(&pool).await {
        close_pool(&pool).await;
        return Err(e);
    }
    Ok(pool)
}

/// 关闭连接池，等待所有连接归还
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    info!("PostgreSQL connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy("postgres://postgres@127.0.0.1:1/postgres?sslmode=disable")
            .unwrap()
    }

    #[tokio::test]
    async fn test_check_connection_fails_without_server() {
        let pool = unreachable_pool();
        let result = check_connection(&pool).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_verify_pool_closes_pool_on_failure() {
        let pool = unreachable_pool();

        let result = verify_pool(pool.clone()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(pool.is_closed());
    }
}
