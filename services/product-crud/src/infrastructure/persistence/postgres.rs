//! 商品仓储的 PostgreSQL 实现

use adapter_postgres::TransactionManager;
use async_trait::async_trait;
use errors::{AppError, AppResult};
use sqlx::{PgConnection, PgPool};

use crate::domain::entities::{NewProduct, Product, ProductId};
use crate::domain::repositories::ProductRepository;

use super::rows::ProductRow;

const SELECT_FIRST: &str = r#"
    SELECT id, name, price, stock, created_at, updated_at
    FROM products
    ORDER BY created_at ASC, id ASC
    LIMIT 1
"#;

const SELECT_BY_ID: &str = r#"
    SELECT id, name, price, stock, created_at, updated_at
    FROM products
    WHERE id = $1
"#;

const INSERT: &str = r#"
    INSERT INTO products (name, price, stock)
    VALUES ($1, $2, $3)
    RETURNING id, name, price, stock, created_at, updated_at
"#;

const UPDATE_PRICE: &str = r#"
    UPDATE products SET
        price = $1,
        updated_at = NOW()
    WHERE id = $2
    RETURNING id, name, price, stock, created_at, updated_at
"#;

const DELETE_BY_ID: &str = "DELETE FROM products WHERE id = $1";

pub struct PostgresProductRepository {
    pool: PgPool,
    tm: TransactionManager,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tm: TransactionManager::new(pool.clone()),
            pool,
        }
    }
}

async fn fetch_first(conn: &mut PgConnection) -> AppResult<Option<ProductRow>> {
    sqlx::query_as::<_, ProductRow>(SELECT_FIRST)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::database(format!("查询商品失败: {}", e)))
}

async fn set_price(
    conn: &mut PgConnection,
    id: ProductId,
    price: f64,
) -> AppResult<Option<ProductRow>> {
    sqlx::query_as::<_, ProductRow>(UPDATE_PRICE)
        .bind(price)
        .bind(id.0)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::database(format!("更新商品价格失败: {}", e)))
}

async fn delete_by_id(conn: &mut PgConnection, id: ProductId) -> AppResult<bool> {
    let result = sqlx::query(DELETE_BY_ID)
        .bind(id.0)
        .execute(conn)
        .await
        .map_err(|e| AppError::database(format!("删除商品失败: {}", e)))?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: &NewProduct) -> AppResult<Product> {
        let product = product.clone();
        let row = self
            .tm
            .in_transaction(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, ProductRow>(INSERT)
                        .bind(product.name)
                        .bind(product.price)
                        .bind(product.stock)
                        .fetch_one(&mut *conn)
                        .await
                        .map_err(|e| AppError::database(format!("保存商品失败: {}", e)))
                })
            })
            .await?;

        Ok(row.into())
    }

    async fn find_first(&self) -> AppResult<Option<Product>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("获取数据库连接失败: {}", e)))?;

        Ok(fetch_first(&mut *conn).await?.map(Into::into))
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(SELECT_BY_ID)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询商品失败: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn update_first_price(&self, price: f64) -> AppResult<Option<Product>> {
        let row = self
            .tm
            .in_transaction(move |conn| {
                Box::pin(async move {
                    let Some(first) = fetch_first(&mut *conn).await? else {
                        return Ok(None);
                    };
                    set_price(&mut *conn, ProductId(first.id), price).await
                })
            })
            .await?;

        Ok(row.map(Into::into))
    }

    async fn update_price(&self, id: ProductId, price: f64) -> AppResult<Option<Product>> {
        let row = self
            .tm
            .in_transaction(move |conn| Box::pin(async move { set_price(&mut *conn, id, price).await }))
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_first(&self) -> AppResult<Option<Product>> {
        let row = self
            .tm
            .in_transaction(move |conn| {
                Box::pin(async move {
                    let Some(first) = fetch_first(&mut *conn).await? else {
                        return Ok(None);
                    };
                    if delete_by_id(&mut *conn, ProductId(first.id)).await? {
                        Ok(Some(first))
                    } else {
                        Ok(None)
                    }
                })
            })
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        self.tm
            .in_transaction(move |conn| Box::pin(async move { delete_by_id(&mut *conn, id).await }))
            .await
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询商品总数失败: {}", e)))
    }
}
