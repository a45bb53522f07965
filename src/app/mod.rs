//! 应用层：路由与处理器

pub mod product;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::{error::CoreError, middleware::request_logging_middleware};
use product::handler::{self, AppState};

/// 构建完整路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health_check))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// API 信息
async fn api_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the product catalog API.",
        "data_path": state.product_service.data_location(),
    }))
}

/// 健康检查
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CoreError> {
    let service = state.product_service;
    let products_count = handler::run_blocking(move || service.count()).await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "products_count": products_count,
    })))
}
