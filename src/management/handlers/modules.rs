//! # 监控模块管理处理器

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::response::Response;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::failure;
use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::RequestId;
use crate::management::{response, server::AppState};
use crate::orchestrator::ModuleDescriptor;

/// 注册请求体
#[derive(Debug, Deserialize)]
pub struct RegisterModuleRequest {
    pub url: String,
}

/// 注册成功后返回的模块信息
#[derive(Debug, Serialize)]
pub struct RegisteredModule {
    pub id: u64,
    pub location: String,
    pub url: String,
}

/// 列出所有监控模块
pub async fn list_modules(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match state.orchestrator.list_modules().await {
        Ok(listing) => {
            let modules: Vec<ModuleDescriptor> = listing.collect().await;
            response::success(modules)
        }
        Err(err) => failure(&request_id, "list_modules_failed", "获取监控模块列表失败", err),
    }
}

/// 注册监控模块
pub async fn register_module(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RegisterModuleRequest>,
) -> Response {
    match state.orchestrator.register_module(&request.url).await {
        Ok((module, location)) => {
            linfo!(
                request_id,
                LogStage::Request,
                LogComponent::Management,
                "register_module",
                "监控模块注册成功",
                module_id = module.id
            );
            response::success_with_message(
                RegisteredModule {
                    id: module.id,
                    location,
                    url: module.url,
                },
                "监控模块注册成功",
            )
        }
        Err(err) => failure(
            &request_id,
            "register_module_failed",
            &format!("监控模块注册失败: {}", request.url),
            err,
        ),
    }
}

/// 删除监控模块
pub async fn remove_module(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u64>,
) -> Response {
    match state.orchestrator.remove_module(id).await {
        Ok(()) => response::success_without_data("监控模块已删除"),
        Err(err) => failure(&request_id, "remove_module_failed", "删除监控模块失败", err),
    }
}
