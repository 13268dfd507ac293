//! 应用上下文
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::Result;
use crate::orchestrator::{ModuleOrchestrator, OrchestratorSettings};
use crate::probe::{HttpModuleProbe, ModuleProbe};
use crate::store::{ModuleStore, SeaOrmModuleStore};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub orchestrator: Arc<ModuleOrchestrator>,
}

impl AppContext {
    #[must_use]
    pub const fn new(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        orchestrator: Arc<ModuleOrchestrator>,
    ) -> Self {
        Self {
            config,
            db,
            orchestrator,
        }
    }

    /// 按配置装配 `SQLite` 存储与 HTTP 模块客户端
    pub fn build(config: AppConfig, db: Arc<DatabaseConnection>) -> Result<Self> {
        let store: Arc<dyn ModuleStore> = Arc::new(SeaOrmModuleStore::new(Arc::clone(&db)));
        let probe: Arc<dyn ModuleProbe> = Arc::new(HttpModuleProbe::new(&config.probe)?);
        let orchestrator = Arc::new(ModuleOrchestrator::new(
            store,
            probe,
            OrchestratorSettings::from_config(&config),
        ));

        Ok(Self::new(Arc::new(config), db, orchestrator))
    }
}
