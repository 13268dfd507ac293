//! # 集成测试公共工具

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use module_monitor::cache::CacheTtl;
use module_monitor::config::ProbeConfig;
use module_monitor::probe::HttpModuleProbe;
use module_monitor::store::SeaOrmModuleStore;
use module_monitor::{ModuleOrchestrator, OrchestratorSettings};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

/// 测试用的短超时配置
pub fn probe_config() -> ProbeConfig {
    ProbeConfig {
        test_timeout_secs: 1,
        location_timeout_secs: 1,
        connect_timeout_secs: 1,
    }
}

pub fn settings(test_result_ttl: Duration) -> OrchestratorSettings {
    OrchestratorSettings {
        test_result_ttl: CacheTtl::from_duration(test_result_ttl),
        probe_timeout: Duration::from_secs(2),
        ..OrchestratorSettings::default()
    }
}

pub fn orchestrator(
    db: &Arc<DatabaseConnection>,
    settings: OrchestratorSettings,
) -> ModuleOrchestrator {
    let store = Arc::new(SeaOrmModuleStore::new(Arc::clone(db)));
    let probe = Arc::new(HttpModuleProbe::new(&probe_config()).expect("probe client"));
    ModuleOrchestrator::new(store, probe, settings)
}

/// 启动一个同时实现 `/location` 和 `/test` 的模块
pub async fn module_server(location: &str, report: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "location": location })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report))
        .mount(&server)
        .await;
    server
}

/// 模块收到的指定路径请求数
pub async fn hits(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .count()
}
