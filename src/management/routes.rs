//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::routing::{delete, get};

use crate::management::handlers::{health, modules, services};
use crate::management::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查路由
        .route("/health", get(health::health_check))
        // 监控模块管理路由
        .nest("/modules", module_routes())
        // 目标服务测试路由
        .nest("/services", service_routes())
        .with_state(state)
}

/// 监控模块管理路由
fn module_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(modules::list_modules).post(modules::register_module))
        .route("/{id}", delete(modules::remove_module))
}

/// 目标服务测试路由
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/test", get(services::test_service))
        .route("/{id}/status", get(services::service_status))
}
