//! 产品目录：模型、仓储、服务、处理器

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
