//! # 管理API模块
//!
//! 提供RESTful API接口用于监控模块管理和目标服务状态查询

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use routes::create_routes;
pub use server::{AppState, ManagementServer};
