//! 产品集合存储
//!
//! 存储以整体为单位读写全部产品。文件存储在内容不是合法 JSON 时返回空集合，
//! 这是有意保留的恢复路径，会记录 warn 日志但不返回错误；JSON 合法但记录
//! 与产品结构不符时返回 `CatalogError::Serialization`。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, warn};

use crate::app::product::model::Product;
use crate::core::error::CatalogError;

/// 产品集合的持久化能力
pub trait ProductStore: Send + Sync {
    /// 读取完整集合
    fn load(&self) -> Result<Vec<Product>, CatalogError>;

    /// 覆盖写入完整集合
    fn save(&self, products: &[Product]) -> Result<(), CatalogError>;

    /// 人类可读的存储位置
    fn location(&self) -> String;
}

/// 单个 JSON 文件存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ProductStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("数据文件不存在，返回空集合: {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // 只有语法错误才按空集合处理；结构不符时返回错误，避免后续写入覆盖原有记录
        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "数据文件解析失败，按空集合处理: {} ({})",
                    self.path.display(),
                    e
                );
                return Ok(Vec::new());
            }
        };

        serde_json::from_value(value).map_err(|e| {
            error!("数据文件记录格式不符: {} ({})", self.path.display(), e);
            CatalogError::Serialization(e)
        })
    }

    fn save(&self, products: &[Product]) -> Result<(), CatalogError> {
        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(products)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("已写入 {} 个产品到 {}", products.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存存储，用于测试
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }
}

impl ProductStore for MemoryStore {
    fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.products.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(products.clone())
    }

    fn save(&self, products: &[Product]) -> Result<(), CatalogError> {
        let mut stored = self.products.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = products.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::NewProduct;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        fs::write(&path, "").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let coffee = NewProduct::new("Coffee", 4.0).into_product();
        let mut records = serde_json::to_value(vec![coffee.clone(), coffee]).unwrap();
        records[0]
            .as_object_mut()
            .unwrap()
            .remove("created_at");
        fs::write(&path, records.to_string()).unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(CatalogError::Serialization(_))));

        fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        assert!(matches!(store.load(), Err(CatalogError::Serialization(_))));
    }

    #[test]
    fn test_save_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("products.json");
        let store = JsonFileStore::new(&path);

        let tea = NewProduct::new("Tea", 3.5).into_product();
        let coffee = NewProduct::new("Coffee", 4.0).into_product();
        store.save(&[tea.clone(), coffee.clone()]).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), vec![tea.clone(), coffee]);

        store.save(&[tea.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![tea]);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_saved_file_is_pretty_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonFileStore::new(&path);

        let product = NewProduct::new("Tea", 3.5).into_product();
        store.save(&[product.clone()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(raw[0]["id"], product.id.to_string());
        assert_eq!(raw[0]["category"], serde_json::Value::Null);
        assert_eq!(raw[0]["in_stock"], true);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let product = NewProduct::new("Tea", 3.5).into_product();
        store.save(&[product.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![product]);
        assert_eq!(store.location(), "memory");
    }
}
