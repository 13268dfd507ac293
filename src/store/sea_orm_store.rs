//! # `SQLite` 模块存储

use std::sync::Arc;

use async_trait::async_trait;
use entity::{MonitoringModules, monitoring_modules};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::{ModuleStore, MonitoringModule};
use crate::error::{Context, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};

/// 基于 sea-orm 的模块存储
#[derive(Debug, Clone)]
pub struct SeaOrmModuleStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmModuleStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModuleStore for SeaOrmModuleStore {
    async fn add(&self, url: &str) -> Result<MonitoringModule> {
        let model = monitoring_modules::ActiveModel {
            url: Set(url.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .context("保存监控模块失败")?;

        let module = MonitoringModule::try_from(model)?;
        linfo!(
            "system",
            LogStage::Db,
            LogComponent::Store,
            "add_module",
            "监控模块已保存",
            module_id = module.id,
            url = %module.url
        );
        Ok(module)
    }

    async fn find(&self, id: u64) -> Result<Option<MonitoringModule>> {
        // 超出 i64 范围的ID不可能存在
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        MonitoringModules::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("查询监控模块失败")?
            .map(MonitoringModule::try_from)
            .transpose()
    }

    async fn remove(&self, module: &MonitoringModule) -> Result<()> {
        let Ok(id) = i64::try_from(module.id) else {
            return Ok(());
        };

        MonitoringModules::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("删除监控模块失败")?;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<MonitoringModule>> {
        MonitoringModules::find()
            .order_by_asc(monitoring_modules::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("查询监控模块列表失败")?
            .into_iter()
            .map(MonitoringModule::try_from)
            .collect()
    }
}
