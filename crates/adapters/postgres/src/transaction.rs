//! PostgreSQL 事务管理模块
//!
//! 提供作用域事务：开始、执行、成功提交、失败回滚。

use errors::{AppError, AppResult};
use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, warn};

/// 事务管理器
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    /// 创建新的事务管理器
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 开始事务
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))
    }

    /// 提交事务
    pub async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    /// 回滚事务
    pub async fn rollback(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }

    /// 在单个事务中执行操作
    ///
    /// 闭包返回 `Ok` 时提交，返回 `Err` 时回滚并原样返回该错误。
    /// 回滚失败只记录日志，调用方看到的始终是操作本身的错误。
    ///
    /// ```ignore
    /// let id = tm
    ///     .in_transaction(|conn| {
    ///         Box::pin(async move {
    ///             sqlx::query_scalar("INSERT INTO t (v) VALUES (1) RETURNING id")
    ///                 .fetch_one(&mut *conn)
    ///                 .await
    ///                 .map_err(|e| AppError::database(e.to_string()))
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn in_transaction<T, F>(&self, operation: F) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, AppResult<T>> + Send,
    {
        let mut tx = self.begin().await?;

        match operation(&mut *tx).await {
            Ok(value) => {
                Self::commit(tx).await?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(e) => {
                match Self::rollback(tx).await {
                    Ok(()) => debug!(error = %e, "Transaction rolled back"),
                    Err(rollback_err) => warn!(
                        error = %e,
                        rollback_error = %rollback_err,
                        "Rollback failed"
                    ),
                }
                Err(e)
            }
        }
    }
}
