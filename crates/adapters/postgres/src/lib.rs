//! adapter-postgres - PostgreSQL 适配器
//!
//! 连接池、连接配置、作用域事务和幂等的表结构初始化

mod config;
mod connection;
mod schema;
mod transaction;

pub use config::*;
pub use connection::*;
pub use schema::*;
pub use transaction::*;
