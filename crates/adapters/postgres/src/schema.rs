//! 表结构初始化模块
//!
//! 实体的表定义以显式的 `TableSchema` 值注册到 `SchemaManager`，
//! 初始化时逐条执行 `CREATE ... IF NOT EXISTS`，重复执行无副作用。
//! DDL 直接在连接池上执行，不包裹在显式事务中（DSQL 不允许 DDL 与 DML 混在同一事务）。

use errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{debug, info};

/// 二级索引定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// 索引名
    pub name: String,
    /// 索引列
    pub columns: Vec<String>,
}

/// 表结构定义
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// 表名
    pub name: String,
    /// 列定义（`CREATE TABLE` 括号内的部分）
    pub columns: Vec<String>,
    /// 二级索引
    pub indexes: Vec<IndexDefinition>,
}

impl TableSchema {
    /// 创建新的表定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// 添加列定义
    pub fn column(mut self, definition: impl Into<String>) -> Self {
        self.columns.push(definition.into());
        self
    }

    /// 添加二级索引
    pub fn index(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.indexes.push(IndexDefinition {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// 生成建表语句
    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            self.columns.join(", ")
        )
    }

    /// 生成建索引语句
    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    index.name,
                    self.name,
                    index.columns.join(", ")
                )
            })
            .collect()
    }
}

/// 表结构管理器
pub struct SchemaManager {
    pool: PgPool,
    tables: Vec<TableSchema>,
}

impl SchemaManager {
    /// 创建新的表结构管理器
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tables: Vec::new(),
        }
    }

    /// 注册表定义
    pub fn register(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// 确保所有已注册的表和索引存在
    pub async fn ensure(&self) -> AppResult<()> {
        for table in &self.tables {
            sqlx::query(&table.create_table_sql())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to create table {}: {}", table.name, e))
                })?;
            debug!(table = %table.name, "Table ensured");

            for (index, sql) in table.indexes.iter().zip(table.create_index_sql()) {
                sqlx::query(&sql).execute(&self.pool).await.map_err(|e| {
                    AppError::database(format!("Failed to create index {}: {}", index.name, e))
                })?;
                debug!(table = %table.name, index = %index.name, "Index ensured");
            }

            info!(
                table = %table.name,
                indexes = table.indexes.len(),
                "Schema initialized"
            );
        }
        Ok(())
    }

    /// 表是否存在（当前 schema）
    pub async fn table_exists(&self, table: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pg_catalog.pg_tables
                WHERE schemaname = current_schema() AND tablename = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check table {}: {}", table, e)))
    }

    /// 表上的索引名（包含主键索引）
    pub async fn index_names(&self, table: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT indexname FROM pg_catalog.pg_indexes
            WHERE schemaname = current_schema() AND tablename = $1
            ORDER BY indexname
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list indexes of {}: {}", table, e)))
    }
}
