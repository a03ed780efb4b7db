//! product-crud - 基于 DSQL 令牌认证的商品 CRUD 演示

use std::sync::Arc;

use adapter_postgres::SchemaManager;
use tracing::info;

use product_crud::application::CrudHandler;
use product_crud::infrastructure::persistence::{PostgresProductRepository, product_table};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    bootstrap::run("config", |pool| async move {
        SchemaManager::new(pool.clone())
            .register(product_table())
            .ensure()
            .await?;
        info!("Schema ready");

        let repo = Arc::new(PostgresProductRepository::new(pool));
        let handler = CrudHandler::new(repo);

        let summary = handler.run_all().await;
        info!(failures = summary.failures(), "CRUD run complete");

        Ok(())
    })
    .await
}
