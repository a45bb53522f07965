//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// 目录领域错误
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 输入字段不满足约束
    #[error("{0}")]
    Validation(String),

    /// 创建时名称冲突（忽略大小写、去除首尾空白后比较）
    #[error("Product with this name already exists.")]
    DuplicateName { name: String },

    /// 按 id 查找失败，或过滤结果为空
    #[error("{0}")]
    NotFound(String),

    #[error("存储读写失败: {0}")]
    Storage(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{field}: invalid value"))
                })
            })
            .collect();
        // HashMap 迭代顺序不稳定
        messages.sort();

        CatalogError::Validation(messages.join(", "))
    }
}

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(_) | CatalogError::DuplicateName { .. } => {
                CoreError::BadRequest(err.to_string())
            }
            CatalogError::NotFound(msg) => CoreError::NotFound(msg),
            CatalogError::Storage(_) | CatalogError::Serialization(_) => {
                error!("存储层错误: {}", err);
                CoreError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, error_message, user_message) = match self {
            CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            CoreError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                msg,
            ),
        };

        let error_response = ErrorResponse {
            error: error_message.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}
