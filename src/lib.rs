//! # 产品目录服务
//!
//! 基于单个 JSON 文件的产品目录 CRUD 服务，分层如下：
//! - `infrastructure`：配置、日志、产品集合存储
//! - `app`：产品模型、仓储、服务与 HTTP 处理器
//! - `core`：错误类型、响应结构、中间件
//! - `client`：看板使用的 HTTP 客户端

pub mod app;
pub mod client;
pub mod core;
pub mod infrastructure;
