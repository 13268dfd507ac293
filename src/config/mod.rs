//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和验证

mod app_config;
mod database;

pub use app_config::{AppConfig, CacheConfig, ProbeConfig, ServerConfig, StatusConfig};
pub use database::DatabaseConfig;

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Context, MonitorError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "MODULE_MONITOR_CONFIG_PATH";
/// 覆盖数据库URL的环境变量
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// 覆盖监听端口的环境变量
pub const PORT_ENV: &str = "MODULE_MONITOR_PORT";

/// 解析配置文件路径
///
/// 优先级：显式路径 > `MODULE_MONITOR_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    PathBuf::from(format!("config/config.{env}.toml"))
}

/// 加载配置文件
///
/// 文件不存在时使用默认配置；随后应用环境变量覆盖并校验。
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_config_path(explicit);

    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件失败: {}", config_path.display()))?;
        let config = parse_config(&content)?;
        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Config,
            "config_loaded",
            format!("配置文件加载完成: {}", config_path.display())
        );
        config
    } else {
        lwarn!(
            "system",
            LogStage::Startup,
            LogComponent::Config,
            "config_missing",
            format!("配置文件不存在, 使用默认配置: {}", config_path.display())
        );
        AppConfig::default()
    };

    apply_env_overrides(&mut config, |name| env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

/// 从 TOML 文本解析配置
pub fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

/// 应用环境变量覆盖
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(DATABASE_URL_ENV) {
        config.database.url = url;
    }
    if let Some(port) = lookup(PORT_ENV) {
        config.server.port = port.parse().map_err(|e| {
            MonitorError::config_with_source(format!("{PORT_ENV} 不是合法端口: {port}"), e)
        })?;
    }
    Ok(())
}
