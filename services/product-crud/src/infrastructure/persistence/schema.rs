//! 商品表结构定义

use adapter_postgres::TableSchema;

pub const PRODUCTS_TABLE: &str = "products";

/// 商品表及其两个二级索引
pub fn product_table() -> TableSchema {
    TableSchema::new(PRODUCTS_TABLE)
        .column("id UUID PRIMARY KEY DEFAULT gen_random_uuid()")
        .column("name VARCHAR NOT NULL")
        .column("price DOUBLE PRECISION NOT NULL")
        .column("stock INTEGER NOT NULL")
        .column("created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()")
        .column("updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()")
        .index("ix_product_name", &["name"])
        .index("ix_product_price", &["price"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_table_definition() {
        let table = product_table();
        assert_eq!(table.name, "products");
        assert_eq!(table.columns.len(), 6);

        let indexes: Vec<&str> = table.indexes.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(indexes, vec!["ix_product_name", "ix_product_price"]);
    }

    #[test]
    fn test_product_table_sql() {
        let table = product_table();
        let sql = table.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS products ("));
        assert!(sql.contains("id UUID PRIMARY KEY DEFAULT gen_random_uuid()"));
        assert!(sql.contains("updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()"));

        assert_eq!(
            table.create_index_sql(),
            vec![
                "CREATE INDEX IF NOT EXISTS ix_product_name ON products (name)".to_string(),
                "CREATE INDEX IF NOT EXISTS ix_product_price ON products (price)".to_string(),
            ]
        );
    }
}
