//! # 模块调用错误
//!
//! 编排器在扇出调用时直接消化这些错误，只有注册流程会把它包装成
//! [`MonitorError::InvalidModule`](super::MonitorError::InvalidModule)。

use thiserror::Error;

/// 单次模块调用（`/location` 或 `/test`）的失败原因
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("模块请求失败: {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("模块请求超时（{timeout_ms}ms）: {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("模块返回状态码 {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("模块响应格式错误: {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("模块响应缺少 `location` 字段: {url}")]
    MissingLocation { url: String },
}

impl ProbeError {
    /// 归类 reqwest 错误，超时单独区分
    pub fn from_reqwest(url: impl Into<String>, timeout_ms: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.into(),
                timeout_ms,
            }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// 响应体无法解析
    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 是否为超时类失败
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
