//! product-crud - 使用 DSQL 令牌认证的商品 CRUD 演示

pub mod application;
pub mod domain;
pub mod infrastructure;
