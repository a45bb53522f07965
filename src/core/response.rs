//! 核心响应处理模块

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 分页列表响应
///
/// `total` 是分页前的过滤结果数量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub total: usize,
    pub limit: usize,
    pub items: Vec<T>,
}

/// 删除确认
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
    pub id: Uuid,
}

impl DeleteConfirmation {
    pub fn deleted(id: Uuid) -> Self {
        Self {
            message: "Deleted successfully".to_string(),
            id,
        }
    }
}
