//! # 管理服务器
//!
//! Axum HTTP服务器，对外暴露监控模块管理和目标服务测试API

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::middleware::request_id_middleware;
use crate::app::AppContext;
use crate::error::{Context, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};

/// API前缀
pub const API_PREFIX: &str = "/api";

/// 管理服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 管理服务器
pub struct ManagementServer {
    listen_address: String,
    router: Router,
}

impl ManagementServer {
    /// 创建新的管理服务器
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let listen_address = context.config.server.listen_address();
        let router = Self::create_router(AppState::new(context));

        Self {
            listen_address,
            router,
        }
    }

    /// 创建路由器
    pub fn create_router(state: AppState) -> Router {
        let api_routes = super::routes::create_routes(state);

        Router::new().nest(API_PREFIX, api_routes).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
    }

    /// 获取路由器（测试中直接驱动）
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 启动服务器，`shutdown` 完成后优雅退出
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.listen_address)
            .await
            .with_context(|| format!("绑定管理端口失败: {}", self.listen_address))?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Management,
            "server_start",
            format!("管理服务启动: {}", self.listen_address)
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("管理服务运行失败")?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::Management,
            "server_stop",
            "管理服务已停止"
        );
        Ok(())
    }
}
