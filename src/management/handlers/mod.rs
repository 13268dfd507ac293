//! # 管理API处理器

pub mod health;
pub mod modules;
pub mod services;

use axum::response::Response;

use crate::error::{ErrorCategory, MonitorError};
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::RequestId;
use crate::management::response;
use crate::{lerror, lwarn};

/// 记录失败并转换为错误响应
///
/// 调用方错误记为 warn，服务端错误记为 error。
pub(crate) fn failure(
    request_id: &RequestId,
    operation: &'static str,
    message: &str,
    err: MonitorError,
) -> Response {
    match err.category() {
        ErrorCategory::Client => lwarn!(
            request_id,
            LogStage::Request,
            LogComponent::Management,
            operation,
            message,
            error = %err
        ),
        ErrorCategory::Server => lerror!(
            request_id,
            LogStage::Error,
            LogComponent::Management,
            operation,
            message,
            error = %err
        ),
    }
    response::app_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn failure_keeps_status_of_each_category() {
        let request_id = RequestId::new();

        let client = failure(
            &request_id,
            "remove_module_failed",
            "删除监控模块失败",
            MonitorError::module_not_found(3),
        );
        assert_eq!(client.status(), StatusCode::NOT_FOUND);

        let server = failure(
            &request_id,
            "list_modules_failed",
            "获取监控模块列表失败",
            MonitorError::database("database is locked"),
        );
        assert_eq!(server.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
