//! 产品仓储
//!
//! 每个操作都完整地读取集合、修改、再整体写回，之间不保留缓存。

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::model::{normalize_name, Product, ProductPatch};
use crate::core::error::CatalogError;
use crate::core::response::DeleteConfirmation;
use crate::infrastructure::store::ProductStore;

#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn ProductStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.store.load()
    }

    pub fn find(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        Ok(self.list_all()?.into_iter().find(|p| p.id == id))
    }

    pub fn add(&self, product: Product) -> Result<Product, CatalogError> {
        let mut products = self.store.load()?;

        let normalized = product.normalized_name();
        if products.iter().any(|p| normalize_name(&p.name) == normalized) {
            return Err(CatalogError::DuplicateName { name: product.name });
        }

        products.push(product.clone());
        self.store.save(&products)?;
        debug!("新增产品 {} ({})", product.name, product.id);
        Ok(product)
    }

    pub fn remove(&self, id: Uuid) -> Result<DeleteConfirmation, CatalogError> {
        let products = self.store.load()?;
        let before = products.len();
        let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();

        if remaining.len() == before {
            return Err(CatalogError::NotFound("Product not found.".to_string()));
        }

        self.store.save(&remaining)?;
        debug!("删除产品 {}", id);
        Ok(DeleteConfirmation::deleted(id))
    }

    pub fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, CatalogError> {
        let mut products = self.store.load()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound("Product not found.".to_string()))?;

        product.apply(patch);
        let updated = product.clone();

        self.store.save(&products)?;
        debug!("更新产品 {}", id);
        Ok(updated)
    }
}
