//! 商品仓储接口

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::{NewProduct, Product, ProductId};

/// 商品仓储接口
///
/// `*_first` 系列方法作用于"第一行"：按 `created_at`、`id` 升序排序后的第一条记录，
/// 查找与写入在同一事务中完成。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 插入商品，返回数据库填充后的完整记录
    async fn insert(&self, product: &NewProduct) -> AppResult<Product>;

    /// 查找第一行
    async fn find_first(&self) -> AppResult<Option<Product>>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 更新第一行的价格，表为空时返回 `None`
    async fn update_first_price(&self, price: f64) -> AppResult<Option<Product>>;

    /// 更新指定商品的价格，不存在时返回 `None`
    async fn update_price(&self, id: ProductId, price: f64) -> AppResult<Option<Product>>;

    /// 删除第一行，返回被删除的记录
    async fn delete_first(&self) -> AppResult<Option<Product>>;

    /// 删除指定商品，返回是否删除了记录
    async fn delete(&self, id: ProductId) -> AppResult<bool>;

    /// 商品总数
    async fn count(&self) -> AppResult<i64>;
}
