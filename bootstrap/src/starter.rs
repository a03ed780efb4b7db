//! 服务启动器
//!
//! 提供统一的启动模式

use std::future::Future;

use config::AppConfig;
use errors::AppResult;
use sqlx::PgPool;
use tracing::{error, info};

use crate::infrastructure::Infrastructure;
use crate::runtime::init_runtime;

/// 运行一次性任务
///
/// 1. 加载配置
/// 2. 初始化日志
/// 3. 申请令牌并创建连接池（失败即返回，进程以非零状态退出）
/// 4. 调用用户提供的闭包
/// 5. 无论闭包成功与否都关闭连接池
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     bootstrap::run("config", |pool| async move {
///         do_work(pool).await
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(config_dir: &str, task: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(PgPool) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {}", config.app_name);

    // 3. 创建基础设施
    let infra = Infrastructure::from_config(config).await.inspect_err(|e| {
        error!(error = %e, "Failed to initialize infrastructure");
    })?;

    // 4. 执行任务
    let result = task(infra.postgres_pool()).await;

    // 5. 清理
    infra.shutdown().await;

    if let Err(ref e) = result {
        error!(error = %e, "Task failed");
    }
    result?;

    info!("{} finished", infra.config().app_name);
    Ok(())
}
