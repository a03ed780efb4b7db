//! bootstrap - 统一启动骨架
//!
//! 加载配置 → 初始化日志 → 申请令牌并建立连接池 → 运行业务 → 关闭连接池

mod infrastructure;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
