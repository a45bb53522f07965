//! 目录 API 客户端
//!
//! 看板通过它调用 HTTP 接口；非 2xx 响应会解析服务端的错误消息。

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::app::product::model::{ListQuery, NewProduct, Product, ProductPatch};
use crate::core::error::ErrorResponse;
use crate::core::response::{DeleteConfirmation, ListResponse};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API 错误 ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_products(
        &self,
        query: &ListQuery,
    ) -> Result<ListResponse<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/products"))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/products/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let response = self
            .http
            .post(self.url("/products"))
            .json(product)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/products/{id}")))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<DeleteConfirmation, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/products/{id}")))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// 取出错误响应中的 `message`，无法解析时返回原文
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

/// 把产品渲染成纯文本表格
pub fn render_products(products: &[Product]) -> String {
    let headers = ["id", "name", "price", "category", "in_stock", "created_at"];
    let rows: Vec<[String; 6]> = products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                format!("{:.2}", p.price),
                p.category.clone().unwrap_or_else(|| "-".to_string()),
                p.in_stock.to_string(),
                p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![format_row(&header_cells[..]), separator];
    lines.extend(rows.iter().map(|row| format_row(&row[..])));
    lines.join("\n")
}
