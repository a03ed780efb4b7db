//! 持久化实现

mod postgres;
mod rows;
mod schema;

pub use postgres::PostgresProductRepository;
pub use schema::{PRODUCTS_TABLE, product_table};
