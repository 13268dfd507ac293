//! # 错误类型定义

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use super::{ErrorCategory, ProbeError};

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 注册输入不是合法的绝对地址
    #[error("无效的模块地址 `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    /// 候选模块未通过 `/location` 自描述校验
    #[error("无效的监控模块 `{url}`")]
    InvalidModule {
        url: String,
        #[source]
        source: ProbeError,
    },

    /// 监控模块不存在
    #[error("监控模块不存在: {id}")]
    ModuleNotFound { id: u64 },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 附加了上下文的错误
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<MonitorError>,
    },

    /// 单飞计算中多个等待者共享的同一个失败
    #[error(transparent)]
    Shared(Arc<MonitorError>),
}

impl MonitorError {
    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "INVALID_URL"),
            Self::InvalidModule { .. } => (StatusCode::BAD_REQUEST, "INVALID_MODULE"),
            Self::ModuleNotFound { .. } => (StatusCode::NOT_FOUND, "MODULE_NOT_FOUND"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Self::Context { source, .. } => source.to_http_response_parts(),
            Self::Shared(inner) => inner.to_http_response_parts(),
        }
    }

    /// 错误归属（调用方 / 服务端）
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        if self.to_http_response_parts().0.is_client_error() {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建无效地址错误
    pub fn invalid_url<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 创建无效模块错误
    pub fn invalid_module<U: Into<String>>(url: U, source: ProbeError) -> Self {
        Self::InvalidModule {
            url: url.into(),
            source,
        }
    }

    #[must_use]
    pub const fn module_not_found(id: u64) -> Self {
        Self::ModuleNotFound { id }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 还原单飞缓存返回的共享错误
    ///
    /// 只有一个持有者时取回原始错误，否则包装为 [`MonitorError::Shared`]。
    #[must_use]
    pub fn from_shared(shared: Arc<Self>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(Self::Shared)
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for MonitorError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<sea_orm::DbErr> for MonitorError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::database_with_source("数据库操作失败", err)
    }
}
