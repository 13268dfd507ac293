//! # 监控模块调用
//!
//! 监控模块是独立部署的 HTTP 服务，只需实现两个端点：
//!
//! - `GET {base}/location`：返回 `{"location": "..."}`，模块的自我描述
//! - `GET {base}/test?url={target}`：返回该模块对目标服务的测试报告（JSON 对象）
//!
//! [`ModuleProbe`] 抽象这两个调用，[`HttpModuleProbe`] 是基于 reqwest 的实现。

mod client;
mod types;

pub use client::HttpModuleProbe;
pub use types::{TargetService, TestReport};

use async_trait::async_trait;

use crate::error::ProbeError;

/// 模块协议客户端
///
/// 实现必须可以被并发调用，且不持有调用之间的可变状态。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleProbe: Send + Sync {
    /// 解析模块的 location
    async fn resolve_location(&self, module_url: &str) -> Result<String, ProbeError>;

    /// 让模块测试目标服务
    async fn run_test(
        &self,
        module_url: &str,
        target: &TargetService,
    ) -> Result<TestReport, ProbeError>;
}
