//! # 目标服务测试处理器
//!
//! 测试结果只按目标服务ID缓存：同一ID在缓存有效期内（默认20秒）即使换了
//! `url` 查询参数，也会拿到第一次请求的报告。

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::failure;
use crate::management::middleware::RequestId;
use crate::management::{response, server::AppState};
use crate::probe::TargetService;
use crate::status::StatusPolicy;

/// 目标服务地址查询参数
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub url: String,
}

/// 汇总后的服务状态
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub service_id: u64,
    /// `None` 表示没有模块给出判断
    pub online: Option<bool>,
    pub policy: StatusPolicy,
    pub report_count: usize,
}

fn target_from(id: u64, query: TargetQuery) -> Result<TargetService, Response> {
    if query.url.trim().is_empty() {
        return Err(response::error(
            StatusCode::BAD_REQUEST,
            "INVALID_TARGET",
            "目标服务地址不能为空",
        ));
    }
    Ok(TargetService::new(id, query.url))
}

/// 获取所有模块对目标服务的测试报告
///
/// 缓存键只有路径中的 `id`；有效期内 `url` 参数不同也返回已缓存的报告。
pub async fn test_service(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u64>,
    Query(query): Query<TargetQuery>,
) -> Response {
    let target = match target_from(id, query) {
        Ok(target) => target,
        Err(rejection) => return rejection,
    };

    match state.orchestrator.test_service(&target).await {
        Ok(reports) => response::success(reports.as_ref()),
        Err(err) => failure(&request_id, "test_service_failed", "目标服务测试失败", err),
    }
}

/// 按配置的汇总策略给出目标服务的在线状态
///
/// 与 [`test_service`] 共用同一份按 `id` 缓存的报告。
pub async fn service_status(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u64>,
    Query(query): Query<TargetQuery>,
) -> Response {
    let target = match target_from(id, query) {
        Ok(target) => target,
        Err(rejection) => return rejection,
    };

    let policy = state.config.status.policy;
    match state.orchestrator.test_service(&target).await {
        Ok(reports) => response::success(ServiceStatus {
            service_id: id,
            online: policy.aggregate(&reports),
            policy,
            report_count: reports.len(),
        }),
        Err(err) => failure(&request_id, "service_status_failed", "目标服务状态汇总失败", err),
    }
}
