//! # 应用配置结构定义

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheTtl;
use crate::ensure_config;
use crate::error::Result;
use crate::status::StatusPolicy;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 管理端 HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 模块调用配置
    pub probe: ProbeConfig,
    /// 缓存配置
    pub cache: CacheConfig,
    /// 在线状态汇总配置
    pub status: StatusConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// 模块调用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// `/test` 单次调用超时（秒）
    pub test_timeout_secs: u64,
    /// `/location` 单次调用超时（秒）
    pub location_timeout_secs: u64,
    /// 建立连接超时（秒）
    pub connect_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            test_timeout_secs: 5,
            location_timeout_secs: 10,
            connect_timeout_secs: 3,
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub const fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_secs)
    }

    #[must_use]
    pub const fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 测试结果缓存时间（秒），0 表示不缓存
    pub test_result_ttl_secs: u64,
    /// 模块位置缓存时间（秒），0 表示不缓存，未配置时在进程生命周期内一直有效
    pub location_ttl_secs: Option<u64>,
    /// 每个缓存的最大条目数
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            test_result_ttl_secs: 20,
            location_ttl_secs: None,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn test_result_ttl(&self) -> CacheTtl {
        CacheTtl::from_duration(Duration::from_secs(self.test_result_ttl_secs))
    }

    #[must_use]
    pub const fn location_ttl(&self) -> CacheTtl {
        match self.location_ttl_secs {
            None => CacheTtl::Indefinite,
            Some(secs) => CacheTtl::from_duration(Duration::from_secs(secs)),
        }
    }
}

/// 在线状态汇总配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub policy: StatusPolicy,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.server.port != 0, "无效的服务器端口: 0");
        ensure_config!(!self.database.url.is_empty(), "数据库URL不能为空");
        ensure_config!(
            self.database.max_connections > 0,
            "数据库最大连接数必须大于0"
        );
        ensure_config!(
            self.probe.test_timeout_secs > 0,
            "probe.test_timeout_secs 必须大于0"
        );
        ensure_config!(
            self.probe.location_timeout_secs > 0,
            "probe.location_timeout_secs 必须大于0"
        );
        ensure_config!(
            self.cache.max_capacity > 0,
            "cache.max_capacity 必须大于0, 当前为 {}",
            self.cache.max_capacity
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.cache.test_result_ttl(),
            CacheTtl::Expires(Duration::from_secs(20))
        );
        assert_eq!(config.cache.location_ttl(), CacheTtl::Indefinite);
        assert_eq!(config.status.policy, StatusPolicy::AnyOffline);
        assert_eq!(config.server.listen_address(), "0.0.0.0:8080");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [cache]
            test_result_ttl_secs = 0

            [status]
            policy = "majority"
            "#,
        )
        .expect("parse partial config");

        assert_eq!(config.cache.test_result_ttl(), CacheTtl::Disabled);
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.status.policy, StatusPolicy::Majority);
        assert_eq!(config.probe.test_timeout(), Duration::from_secs(5));
        assert_eq!(config.cache.location_ttl(), CacheTtl::Indefinite);
    }

    #[test]
    fn zero_ttl_disables_both_caches() {
        let config: AppConfig = toml::from_str(
            r#"
            [cache]
            test_result_ttl_secs = 0
            location_ttl_secs = 0
            "#,
        )
        .expect("parse cache config");

        assert_eq!(config.cache.test_result_ttl(), CacheTtl::Disabled);
        assert_eq!(config.cache.location_ttl(), CacheTtl::Disabled);

        let config: AppConfig = toml::from_str("[cache]\nlocation_ttl_secs = 30\n")
            .expect("parse cache config");
        assert_eq!(
            config.cache.location_ttl(),
            CacheTtl::Expires(Duration::from_secs(30))
        );
    }

    #[test]
    fn zero_probe_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.probe.test_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("test_timeout_secs"));
    }
}
