//! 健康检查处理器

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::database::check_database_status;
use crate::management::{response, server::AppState};

/// 健康检查结果
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}

/// 存活检查，数据库不可用时返回 `degraded`
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = check_database_status(&state.db).await.is_ok();
    response::success(HealthStatus {
        status: if database { "healthy" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}
