//! # 模块编排器
//!
//! 组合模块存储、结果缓存与模块客户端：
//!
//! - 注册：解析地址，经 `/location` 校验后持久化
//! - 移除：按ID删除
//! - 列表：惰性解析每个模块的 location，结果按模块ID缓存
//! - 测试：并发询问所有模块，只收集成功的报告，按目标服务ID缓存

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use url::Url;

use crate::cache::{CacheTtl, ResultCache};
use crate::config::AppConfig;
use crate::error::{MonitorError, ProbeError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::probe::{ModuleProbe, TargetService, TestReport};
use crate::store::{ModuleStore, MonitoringModule};
use crate::{ldebug, linfo, lwarn};

/// 编排器运行参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// 测试结果缓存时间
    pub test_result_ttl: CacheTtl,
    /// 模块 location 缓存时间
    pub location_ttl: CacheTtl,
    /// 单个模块测试调用的上限
    pub probe_timeout: Duration,
    /// 每个缓存的最大条目数
    pub cache_capacity: u64,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            test_result_ttl: CacheTtl::from_seconds(20),
            location_ttl: CacheTtl::Indefinite,
            probe_timeout: Duration::from_secs(5),
            cache_capacity: 10_000,
        }
    }
}

impl OrchestratorSettings {
    #[must_use]
    pub const fn from_config(config: &AppConfig) -> Self {
        Self {
            test_result_ttl: config.cache.test_result_ttl(),
            location_ttl: config.cache.location_ttl(),
            probe_timeout: config.probe.test_timeout(),
            cache_capacity: config.cache.max_capacity,
        }
    }
}

/// 列表中的模块描述，location 解析失败时为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub id: u64,
    pub location: Option<String>,
    pub url: String,
}

/// 模块编排器
pub struct ModuleOrchestrator {
    store: Arc<dyn ModuleStore>,
    probe: Arc<dyn ModuleProbe>,
    test_results: ResultCache<u64, Arc<[TestReport]>>,
    locations: ResultCache<u64, String>,
    settings: OrchestratorSettings,
}

impl ModuleOrchestrator {
    #[must_use]
    pub fn new(
        store: Arc<dyn ModuleStore>,
        probe: Arc<dyn ModuleProbe>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            probe,
            test_results: ResultCache::new(settings.cache_capacity),
            locations: ResultCache::new(settings.cache_capacity),
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// 注册监控模块
    ///
    /// 地址无效时不发起任何网络请求；`/location` 校验失败时不落库。
    /// 成功后 location 会直接写入缓存。
    pub async fn register_module(&self, url_text: &str) -> Result<(MonitoringModule, String)> {
        let candidate = normalize_module_url(url_text)?;

        let location = match self.probe.resolve_location(&candidate).await {
            Ok(location) => location,
            Err(err) => {
                lwarn!(
                    "system",
                    LogStage::Registration,
                    LogComponent::Orchestrator,
                    "validate_module",
                    "模块校验失败, 拒绝注册",
                    url = %candidate,
                    error = %err
                );
                return Err(MonitorError::invalid_module(candidate, err));
            }
        };

        let module = self.store.add(&candidate).await?;
        self.locations
            .insert(module.id, location.clone(), self.settings.location_ttl)
            .await;

        linfo!(
            "system",
            LogStage::Registration,
            LogComponent::Orchestrator,
            "register_module",
            "监控模块注册成功",
            module_id = module.id,
            url = %module.url,
            location = %location
        );
        Ok((module, location))
    }

    /// 移除监控模块
    ///
    /// 已缓存或进行中的测试结果不受影响。
    pub async fn remove_module(&self, id: u64) -> Result<()> {
        let module = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| MonitorError::module_not_found(id))?;

        self.store.remove(&module).await?;
        self.locations.invalidate(&id).await;

        linfo!(
            "system",
            LogStage::Removal,
            LogComponent::Orchestrator,
            "remove_module",
            "监控模块已移除",
            module_id = id,
            url = %module.url
        );
        Ok(())
    }

    /// 按ID顺序惰性列出所有模块
    ///
    /// 模块列表在调用时读取一次；每个元素被消费时才解析其 location，
    /// 未缓存的模块各产生一次往返。解析失败得到空 location 且不缓存。
    pub async fn list_modules(&self) -> Result<impl Stream<Item = ModuleDescriptor> + Send + '_> {
        let modules = self.store.all().await?;
        ldebug!(
            "system",
            LogStage::Listing,
            LogComponent::Orchestrator,
            "list_modules",
            "开始列出监控模块",
            module_count = modules.len()
        );

        Ok(stream::iter(modules).then(move |module| async move {
            let location = self.cached_location(&module).await;
            ModuleDescriptor {
                id: module.id,
                location,
                url: module.url,
            }
        }))
    }

    /// 让所有模块测试目标服务
    ///
    /// 结果只按目标服务ID缓存，有效期内同一ID换了地址也返回已缓存的报告；
    /// 同一目标的并发请求只触发一轮调用。调用方取消时不留下部分结果。
    /// 单个模块失败被丢弃，没有任何成功时返回空列表（同样缓存）。
    /// 结果顺序与模块ID顺序一致。
    pub async fn test_service(&self, target: &TargetService) -> Result<Arc<[TestReport]>> {
        self.test_results
            .get_or_compute(
                target.id,
                self.settings.test_result_ttl,
                self.fan_out(target),
            )
            .await
            .map_err(MonitorError::from_shared)
    }

    async fn cached_location(&self, module: &MonitoringModule) -> Option<String> {
        let resolved = self
            .locations
            .get_or_compute(
                module.id,
                self.settings.location_ttl,
                self.probe.resolve_location(&module.url),
            )
            .await;

        match resolved {
            Ok(location) => Some(location),
            Err(err) => {
                lwarn!(
                    "system",
                    LogStage::Listing,
                    LogComponent::Orchestrator,
                    "resolve_location",
                    "模块 location 解析失败",
                    module_id = module.id,
                    error = %err
                );
                None
            }
        }
    }

    async fn fan_out(&self, target: &TargetService) -> Result<Arc<[TestReport]>> {
        let modules = self.store.all().await?;
        let probes = modules.iter().map(|module| self.probe_module(module, target));
        let reports: Vec<TestReport> = join_all(probes).await.into_iter().flatten().collect();

        linfo!(
            "system",
            LogStage::Probing,
            LogComponent::Orchestrator,
            "test_service",
            "目标服务测试完成",
            service_id = target.id,
            module_count = modules.len(),
            report_count = reports.len()
        );
        Ok(reports.into())
    }

    async fn probe_module(
        &self,
        module: &MonitoringModule,
        target: &TargetService,
    ) -> Option<TestReport> {
        let timeout = self.settings.probe_timeout;
        let outcome = tokio::time::timeout(timeout, self.probe.run_test(&module.url, target))
            .await
            .unwrap_or_else(|_| {
                Err(ProbeError::Timeout {
                    url: module.url.clone(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            });

        match outcome {
            Ok(report) => Some(report),
            Err(err) => {
                lwarn!(
                    "system",
                    LogStage::Probing,
                    LogComponent::Orchestrator,
                    "run_test",
                    "模块测试失败, 忽略该模块",
                    module_id = module.id,
                    service_id = target.id,
                    error = %err
                );
                None
            }
        }
    }
}

/// 校验并规范化模块地址：仅接受不带查询参数的 http/https 地址，去掉片段与结尾斜杠
fn normalize_module_url(url_text: &str) -> Result<String> {
    let mut parsed =
        Url::parse(url_text.trim()).map_err(|e| MonitorError::invalid_url(url_text, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MonitorError::invalid_url(
            url_text,
            format!("不支持的协议: {}", parsed.scheme()),
        ));
    }

    // 端点路径直接拼在地址末尾，查询参数会把它吞掉
    if parsed.query().is_some() {
        return Err(MonitorError::invalid_url(url_text, "模块地址不能包含查询参数"));
    }

    parsed.set_fragment(None);
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
