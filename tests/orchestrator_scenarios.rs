//! # 编排器集成测试
//!
//! 真实 HTTP 模块（wiremock）+ 内存 SQLite 存储下的端到端场景

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use module_monitor::probe::{TargetService, TestReport};
use module_monitor::store::{ModuleStore, SeaOrmModuleStore};
use module_monitor::{ModuleDescriptor, MonitorError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{hits, module_server, orchestrator, settings, setup_test_db};

/// 没有任何服务监听的地址
const UNREACHABLE_MODULE: &str = "http://127.0.0.1:9";

fn target() -> TargetService {
    TargetService::new(1, "https://registrar.university.edu")
}

#[tokio::test]
async fn hung_module_is_rejected_and_listing_shows_only_valid_one() {
    let db = setup_test_db().await;
    let orchestrator = orchestrator(&db, settings(Duration::from_secs(20)));

    let module_a = module_server("ModA", json!({"online": true})).await;
    let module_b = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"location": "ModB"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&module_b)
        .await;

    let (registered, location) = orchestrator.register_module(&module_a.uri()).await.unwrap();
    assert_eq!(location, "ModA");

    let err = orchestrator.register_module(&module_b.uri()).await.unwrap_err();
    assert!(matches!(err, MonitorError::InvalidModule { .. }), "{err}");

    let listed: Vec<_> = orchestrator.list_modules().await.unwrap().collect().await;
    assert_eq!(
        listed,
        vec![ModuleDescriptor {
            id: registered.id,
            location: Some("ModA".to_string()),
            url: module_a.uri(),
        }]
    );
}

#[tokio::test]
async fn unreachable_module_is_dropped_and_results_expire() {
    let db = setup_test_db().await;
    let orchestrator = orchestrator(&db, settings(Duration::from_millis(800)));

    let module_a = module_server("ModA", json!({"online": true})).await;
    orchestrator.register_module(&module_a.uri()).await.unwrap();
    // 注册后下线的模块
    SeaOrmModuleStore::new(Arc::clone(&db))
        .add(UNREACHABLE_MODULE)
        .await
        .unwrap();

    let first = orchestrator.test_service(&target()).await.unwrap();
    let expected: TestReport = serde_json::from_value(json!({"online": true})).unwrap();
    assert_eq!(first.to_vec(), vec![expected]);
    assert_eq!(hits(&module_a, "/test").await, 1);

    let cached = orchestrator.test_service(&target()).await.unwrap();
    assert!(Arc::ptr_eq(&first, &cached));
    assert_eq!(hits(&module_a, "/test").await, 1);

    tokio::time::sleep(Duration::from_millis(1200)).await;
    orchestrator.test_service(&target()).await.unwrap();
    assert_eq!(hits(&module_a, "/test").await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_fan_out() {
    let db = setup_test_db().await;
    let orchestrator = Arc::new(orchestrator(&db, settings(Duration::from_secs(20))));

    let module = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"location": "Slow"})))
        .mount(&module)
        .await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"online": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&module)
        .await;
    orchestrator.register_module(&module.uri()).await.unwrap();

    let callers: Vec<_> = (0..5)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.test_service(&target()).await })
        })
        .collect();

    for caller in callers {
        assert_eq!(caller.await.unwrap().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn failed_validation_persists_nothing() {
    let db = setup_test_db().await;
    let orchestrator = orchestrator(&db, settings(Duration::from_secs(20)));
    let store = SeaOrmModuleStore::new(Arc::clone(&db));

    let module = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&module)
        .await;

    let err = orchestrator.register_module(&module.uri()).await.unwrap_err();
    assert!(matches!(err, MonitorError::InvalidModule { .. }));
    assert!(store.all().await.unwrap().is_empty());

    let err = orchestrator.register_module("not a url").await.unwrap_err();
    assert!(matches!(err, MonitorError::InvalidUrl { .. }));
    assert!(store.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_after_restart_tolerates_unreachable_module() {
    let db = setup_test_db().await;
    let first_run = orchestrator(&db, settings(Duration::from_secs(20)));

    let module_1 = module_server("North", json!({"online": true})).await;
    let module_3 = module_server("South", json!({"online": true})).await;
    first_run.register_module(&module_1.uri()).await.unwrap();
    SeaOrmModuleStore::new(Arc::clone(&db))
        .add(UNREACHABLE_MODULE)
        .await
        .unwrap();
    first_run.register_module(&module_3.uri()).await.unwrap();

    // 新进程的缓存为空，location 需要重新解析
    let second_run = orchestrator(&db, settings(Duration::from_secs(20)));
    let listed: Vec<_> = second_run.list_modules().await.unwrap().collect().await;

    let locations: Vec<_> = listed.iter().map(|d| d.location.as_deref()).collect();
    assert_eq!(locations, vec![Some("North"), None, Some("South")]);
    assert_eq!(hits(&module_1, "/location").await, 2);
}

#[tokio::test]
async fn removal_keeps_cached_results_until_expiry() {
    let db = setup_test_db().await;
    let orchestrator = orchestrator(&db, settings(Duration::from_secs(20)));

    let module = module_server("Annex", json!({"online": true})).await;
    let (registered, _) = orchestrator.register_module(&module.uri()).await.unwrap();

    assert_eq!(orchestrator.test_service(&target()).await.unwrap().len(), 1);
    orchestrator.remove_module(registered.id).await.unwrap();

    assert_eq!(orchestrator.test_service(&target()).await.unwrap().len(), 1);
    assert_eq!(hits(&module, "/test").await, 1);

    let err = orchestrator.remove_module(registered.id).await.unwrap_err();
    assert!(matches!(err, MonitorError::ModuleNotFound { .. }));
}
