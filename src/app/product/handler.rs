//! 产品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use super::model::{ListQuery, NewProduct, Product, ProductPatch};
use super::service::ProductService;
use crate::core::error::{CatalogError, CoreError};
use crate::core::response::{DeleteConfirmation, ListResponse};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// 在阻塞线程池上执行服务调用（文件读写与写锁）
pub async fn run_blocking<T, F>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::InternalServerError(format!("后台任务失败: {e}")))?
        .map_err(CoreError::from)
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Product>>, CoreError> {
    let Query(query) = query.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let service = state.product_service;
    let page = run_blocking(move || service.list_products(&query)).await?;
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let service = state.product_service;
    let product = run_blocking(move || service.get_product(&id)).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let Json(payload) = payload.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let service = state.product_service;
    let product = run_blocking(move || service.create_product(payload)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let Json(patch) = payload.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let service = state.product_service;
    let product = run_blocking(move || service.update_product(&id, patch)).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, CoreError> {
    let service = state.product_service;
    let confirmation = run_blocking(move || service.delete_product(&id)).await?;
    Ok(Json(confirmation))
}
