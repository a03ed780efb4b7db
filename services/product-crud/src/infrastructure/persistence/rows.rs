//! 数据库行映射结构

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::entities::{Product, ProductId};

/// 商品数据库行
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::from_parts(
            ProductId(row.id),
            row.name,
            row.price,
            row.stock,
            row.created_at,
            row.updated_at,
        )
    }
}
