//! 产品目录 HTTP 服务入口

use std::sync::Arc;
use std::time::Duration;

use product_catalog::app::{self, product::handler::AppState};
use product_catalog::app::product::{repository::ProductRepository, service::ProductService};
use product_catalog::infrastructure::{
    config::AppConfig, logger::Logger, store::JsonFileStore,
};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // 初始化日志
    Logger::init(&config.logging.level);

    match &config.source {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    let store = Arc::new(JsonFileStore::new(&config.storage.data_file));
    info!("数据文件: {}", store.path().display());

    let state = AppState {
        product_service: ProductService::new(ProductRepository::new(store)),
    };

    let app = app::router(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.timeout_seconds,
    )));

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;

    info!("🚀 产品目录服务运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /                - API 信息");
    info!("   GET    /health          - 健康检查");
    info!("   GET    /products        - 产品列表 (name, sort_by_price, order, limit, offset)");
    info!("   POST   /products        - 创建产品");
    info!("   GET    /products/:id    - 获取产品");
    info!("   PUT    /products/:id    - 部分更新产品");
    info!("   DELETE /products/:id    - 删除产品");

    axum::serve(listener, app).await?;
    Ok(())
}
