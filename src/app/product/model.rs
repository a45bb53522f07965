//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub const CATEGORY_MAX_LEN: u64 = 50;
pub const DEFAULT_LIMIT: usize = 10;

fn default_in_stock() -> bool {
    true
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// 目录中持久化的产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// 名称唯一性比较使用的规范形式
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// 合并部分更新，只修改 patch 中出现的字段
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 创建产品请求
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "category must be at most 50 characters"))]
    pub category: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            category: None,
            in_stock: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// 分配 id 与创建时间
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: self.name,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
            created_at: Utc::now(),
        }
    }
}

/// 部分更新请求
///
/// `category` 区分「未提供」(`None`) 与「显式置空」(`Some(None)`)；
/// 其余字段的 `null` 视为未提供。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "explicit_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }

    /// 校验所有已提供的字段
    pub fn validate_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(Some(category)) = &self.category {
            if category.chars().count() as u64 > CATEGORY_MAX_LEN {
                let mut error = ValidationError::new("length");
                error.message = Some(Cow::from("category must be at most 50 characters"));
                errors.add("category", error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// 出现的键（包括 `null`）一律包成 `Some`
fn explicit_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// 价格排序方向
///
/// 查询参数与命令行都经由 `FromStr` 解析，大小写不敏感。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("invalid order: {other} (expected asc or desc)")),
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// 解析查询参数中的布尔开关
///
/// 接受 `true/false`、`1/0`、`yes/no`、`on/off`、`t/f`、`y/n`，大小写不敏感。
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid boolean: {raw}")))
}

/// 列表查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub sort_by_price: bool,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            name: None,
            sort_by_price: false,
            order: SortOrder::Asc,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_defaults() {
        let input: NewProduct =
            serde_json::from_str(r#"{"name": "Green Tea", "price": 4.5}"#).unwrap();
        assert!(input.in_stock);
        assert_eq!(input.category, None);
        assert!(input.validate().is_ok());

        let product = input.into_product();
        assert_eq!(product.name, "Green Tea");
        assert!(product.created_at <= Utc::now());
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("", 1.0).validate().is_err());
        assert!(NewProduct::new("x".repeat(101), 1.0).validate().is_err());
        assert!(NewProduct::new("x".repeat(100), 1.0).validate().is_ok());
        assert!(NewProduct::new("Tea", 0.0).validate().is_err());
        assert!(NewProduct::new("Tea", -3.0).validate().is_err());
        assert!(NewProduct::new("Tea", 1.0)
            .with_category("c".repeat(51))
            .validate()
            .is_err());
    }

    #[test]
    fn test_patch_distinguishes_null_category() {
        let absent: ProductPatch = serde_json::from_str(r#"{"price": 9.99}"#).unwrap();
        assert_eq!(absent.category, None);
        assert_eq!(absent.price, Some(9.99));

        let cleared: ProductPatch = serde_json::from_str(r#"{"category": null}"#).unwrap();
        assert_eq!(cleared.category, Some(None));

        let set: ProductPatch = serde_json::from_str(r#"{"category": "drinks"}"#).unwrap();
        assert_eq!(set.category, Some(Some("drinks".to_string())));
    }

    #[test]
    fn test_patch_validation() {
        let patch = ProductPatch {
            category: Some(Some("c".repeat(51))),
            ..Default::default()
        };
        let errors = patch.validate_fields().unwrap_err();
        assert!(errors.errors().contains_key("category"));

        let patch = ProductPatch {
            price: Some(0.0),
            ..Default::default()
        };
        assert!(patch.validate_fields().is_err());

        assert!(ProductPatch::default().validate_fields().is_ok());
    }

    #[test]
    fn test_apply_only_touches_provided_fields() {
        let mut product = NewProduct::new("Tea", 3.0)
            .with_category("drinks")
            .into_product();
        let before = product.clone();

        product.apply(ProductPatch {
            price: Some(9.99),
            ..Default::default()
        });

        assert_eq!(product.price, 9.99);
        assert_eq!(product.name, before.name);
        assert_eq!(product.category, before.category);
        assert_eq!(product.in_stock, before.in_stock);
        assert_eq!(product.created_at, before.created_at);

        product.apply(ProductPatch {
            category: Some(None),
            ..Default::default()
        });
        assert_eq!(product.category, None);
    }

    #[test]
    fn test_parse_flag() {
        for raw in ["true", "1", "YES", "on", "T", "y"] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "No", "OFF", "f", "n"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_sort_order_deserialize_any_case() {
        let order: SortOrder = serde_json::from_str(r#""DESC""#).unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), r#""asc""#);
        assert!(serde_json::from_str::<SortOrder>(r#""up""#).is_err());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
