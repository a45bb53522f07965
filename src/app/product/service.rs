//! 产品业务服务
//!
//! 负责参数校验、名称过滤、价格排序和分页，并把写操作交给仓储。

use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::model::{ListQuery, NewProduct, Product, ProductPatch, SortOrder};
use super::repository::ProductRepository;
use crate::core::error::CatalogError;
use crate::core::response::{DeleteConfirmation, ListResponse};

#[derive(Clone)]
pub struct ProductService {
    repository: ProductRepository,
    // 串行化本进程内的读-改-写，跨进程写入仍可能互相覆盖
    write_lock: Arc<Mutex<()>>,
}

impl ProductService {
    pub fn new(repository: ProductRepository) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn data_location(&self) -> String {
        self.repository.location()
    }

    pub fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.repository.list_all()?.len())
    }

    pub fn list_products(&self, query: &ListQuery) -> Result<ListResponse<Product>, CatalogError> {
        query.validate()?;

        let mut products = self.repository.list_all()?;

        if let Some(name) = &query.name {
            let needle = name.trim().to_lowercase();
            products.retain(|p| p.name.to_lowercase().contains(&needle));
        }

        if products.is_empty() {
            let message = match &query.name {
                Some(name) => format!("No product found matching name={name}"),
                None => "No products found".to_string(),
            };
            return Err(CatalogError::NotFound(message));
        }

        if query.sort_by_price {
            match query.order {
                SortOrder::Asc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
                SortOrder::Desc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            }
        }

        let total = products.len();
        let items = products
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(ListResponse {
            total,
            limit: query.limit,
            items,
        })
    }

    pub fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        let id = parse_id(id)?;
        self.repository
            .find(id)?
            .ok_or_else(|| CatalogError::NotFound("Product not found!".to_string()))
    }

    pub fn create_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        input.validate()?;

        let product = input.into_product();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let product = self.repository.add(product)?;

        info!("创建产品 {} ({})", product.name, product.id);
        Ok(product)
    }

    pub fn delete_product(&self, id: &str) -> Result<DeleteConfirmation, CatalogError> {
        let id = parse_id(id)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let confirmation = self.repository.remove(id)?;

        info!("删除产品 {}", id);
        Ok(confirmation)
    }

    pub fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product, CatalogError> {
        let id = parse_id(id)?;
        patch.validate_fields()?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let product = self.repository.update(id, patch)?;

        info!("更新产品 {}", id);
        Ok(product)
    }
}

fn parse_id(id: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(id).map_err(|_| CatalogError::Validation(format!("invalid product id: {id}")))
}
