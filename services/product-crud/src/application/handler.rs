//! CRUD 驱动
//!
//! 四个操作各自独立：失败时在操作边界记录错误并继续执行下一个操作，
//! 不向调用方传播。回滚由仓储内部的作用域事务完成。

use std::sync::Arc;

use errors::AppError;
use tracing::{error, info};

use crate::domain::entities::{NewProduct, random_price};
use crate::domain::repositories::ProductRepository;

/// 单个操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// 操作完成
    Succeeded,
    /// 没有可操作的记录，未写入
    NotFound,
    /// 操作失败，错误已记录
    Failed,
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub insert: OperationStatus,
    pub select: OperationStatus,
    pub update: OperationStatus,
    pub delete: OperationStatus,
}

impl RunSummary {
    /// 失败的操作数
    pub fn failures(&self) -> usize {
        [self.insert, self.select, self.update, self.delete]
            .iter()
            .filter(|s| **s == OperationStatus::Failed)
            .count()
    }
}

fn log_failure(operation: &str, e: &AppError) -> OperationStatus {
    error!(error_kind = e.kind(), "{} error: {}", operation, e);
    OperationStatus::Failed
}

pub struct CrudHandler {
    repo: Arc<dyn ProductRepository>,
}

impl CrudHandler {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// 插入一个随机商品
    pub async fn insert_product(&self) -> OperationStatus {
        let product = NewProduct::random();

        match self.repo.insert(&product).await {
            Ok(inserted) => {
                info!(
                    id = %inserted.id(),
                    name = %inserted.name(),
                    price = inserted.price(),
                    stock = inserted.stock(),
                    "Insert successful"
                );
                OperationStatus::Succeeded
            }
            Err(e) => log_failure("Insert", &e),
        }
    }

    /// 读取第一行
    pub async fn select_product(&self) -> OperationStatus {
        match self.repo.find_first().await {
            Ok(Some(product)) => {
                info!("Select successful: {}", product.name());
                OperationStatus::Succeeded
            }
            Ok(None) => {
                info!("No product found");
                OperationStatus::NotFound
            }
            Err(e) => log_failure("Select", &e),
        }
    }

    /// 以新的随机价格更新第一行
    pub async fn update_product(&self) -> OperationStatus {
        let price = random_price(&mut rand::thread_rng());

        match self.repo.update_first_price(price).await {
            Ok(Some(product)) => {
                info!(id = %product.id(), price = product.price(), "Update successful");
                OperationStatus::Succeeded
            }
            Ok(None) => {
                info!("No product found to update");
                OperationStatus::NotFound
            }
            Err(e) => log_failure("Update", &e),
        }
    }

    /// 删除第一行
    pub async fn delete_product(&self) -> OperationStatus {
        match self.repo.delete_first().await {
            Ok(Some(product)) => {
                info!(id = %product.id(), "Delete successful");
                OperationStatus::Succeeded
            }
            Ok(None) => {
                info!("No product found to delete");
                OperationStatus::NotFound
            }
            Err(e) => log_failure("Delete", &e),
        }
    }

    /// 依次执行插入、读取、更新、删除
    pub async fn run_all(&self) -> RunSummary {
        info!("Inserting 1 product");
        let insert = self.insert_product().await;

        info!("Selecting 1 product");
        let select = self.select_product().await;

        info!("Updating 1 product");
        let update = self.update_product().await;

        info!("Deleting 1 product");
        let delete = self.delete_product().await;

        RunSummary {
            insert,
            select,
            update,
            delete,
        }
    }
}
