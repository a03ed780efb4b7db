//! 商品实体

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use errors::{AppError, AppResult};
use rand::Rng;
use uuid::Uuid;

/// 随机商品名前缀
pub const NAME_PREFIX: &str = "Product_";

/// 随机价格范围（单位：分），左闭右开，即 [10.00, 1000.00)
pub const PRICE_CENTS_RANGE: std::ops::Range<u32> = 1_000..100_000;

/// 随机库存范围
pub const STOCK_RANGE: RangeInclusive<i32> = 1..=500;

/// 商品 ID（由数据库生成）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 商品实体
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// 从持久化数据重建
    pub fn from_parts(
        id: ProductId,
        name: String,
        price: f64,
        stock: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            price,
            stock,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 待插入的商品（ID 和时间戳由数据库填充）
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

impl NewProduct {
    /// 创建并校验
    pub fn new(name: impl Into<String>, price: f64, stock: i32) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("商品名称不能为空"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::validation(format!("无效的价格: {}", price)));
        }
        if stock < 0 {
            return Err(AppError::validation(format!("无效的库存: {}", stock)));
        }
        Ok(Self { name, price, stock })
    }

    /// 随机生成一个商品
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// 使用给定随机源生成商品
    pub fn random_with<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: random_name(rng),
            price: random_price(rng),
            stock: rng.gen_range(STOCK_RANGE),
        }
    }
}

/// `Product_` 加 8 位十六进制
pub fn random_name<R: Rng>(rng: &mut R) -> String {
    format!("{}{:08x}", NAME_PREFIX, rng.r#gen::<u32>())
}

/// [10, 1000) 内保留两位小数的价格
///
/// 先取整数分再换算，四舍五入不会越过上界。
pub fn random_price<R: Rng>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(PRICE_CENTS_RANGE)) / 100.0
}

/// 是否为随机生成的商品名
pub fn is_generated_name(name: &str) -> bool {
    name.strip_prefix(NAME_PREFIX).is_some_and(|suffix| {
        suffix.len() == 8 && suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    })
}
