//! # 监控模块存储
//!
//! 已注册模块的持久化边界。每次变更在返回前提交。

mod sea_orm_store;

pub use sea_orm_store::SeaOrmModuleStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{MonitorError, Result};
use crate::internal_error;

/// 已注册的监控模块
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoringModule {
    pub id: u64,
    /// 绝对地址，不带结尾斜杠
    pub url: String,
}

impl TryFrom<entity::monitoring_modules::Model> for MonitoringModule {
    type Error = MonitorError;

    fn try_from(model: entity::monitoring_modules::Model) -> Result<Self> {
        let id = u64::try_from(model.id)
            .map_err(|_| internal_error!("监控模块ID超出范围: {}", model.id))?;
        Ok(Self { id, url: model.url })
    }
}

/// 模块存储
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleStore: Send + Sync {
    /// 新增模块，返回分配了ID的记录
    async fn add(&self, url: &str) -> Result<MonitoringModule>;

    /// 按ID查找
    async fn find(&self, id: u64) -> Result<Option<MonitoringModule>>;

    /// 删除模块
    async fn remove(&self, module: &MonitoringModule) -> Result<()>;

    /// 全部模块，按ID升序
    async fn all(&self) -> Result<Vec<MonitoringModule>>;
}
