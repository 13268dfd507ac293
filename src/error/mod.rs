//! # 错误处理
//!
//! - [`MonitorError`]：全局错误类型，配合 [`Result`] 使用
//! - [`ProbeError`]：单次模块调用失败，只在编排器内部被消化或包装
//! - [`Context`]：为任意可转换的错误附加上下文描述
//! - [`ErrorCategory`]：区分调用方错误与服务端错误，决定日志级别

pub use probe::ProbeError;
pub use types::MonitorError;

/// 全局结果类型
pub type Result<T> = std::result::Result<T, MonitorError>;

pub mod macros;
pub mod probe;
pub mod types;

/// 为错误附加上下文
pub trait Context<T> {
    /// 附加固定的上下文描述
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T>;

    /// 仅在出错时生成上下文描述
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: Into<MonitorError>> Context<T> for std::result::Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T> {
        self.with_context(|| context)
    }

    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|error| MonitorError::Context {
            context: context().to_string(),
            source: Box::new(error.into()),
        })
    }
}

/// 错误归属
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 输入问题（无效地址、未知模块），对应 4xx
    Client,
    /// 存储、配置或内部故障，对应 5xx
    Server,
}
