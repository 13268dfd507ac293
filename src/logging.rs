//! # 日志配置模块
//!
//! 初始化 tracing 订阅者，并提供按阶段/组件打标签的结构化日志宏

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志所处的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    Startup,
    Shutdown,
    Registration,
    Removal,
    Listing,
    Probing,
    Cache,
    Db,
    Request,
    Error,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Registration => "registration",
            Self::Removal => "removal",
            Self::Listing => "listing",
            Self::Probing => "probing",
            Self::Cache => "cache",
            Self::Db => "db",
            Self::Request => "request",
            Self::Error => "error",
        }
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    Main,
    Config,
    Database,
    Store,
    Probe,
    Orchestrator,
    Cache,
    Management,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::Store => "store",
            Self::Probe => "probe",
            Self::Orchestrator => "orchestrator",
            Self::Cache => "cache",
            Self::Management => "management",
        }
    }
}

/// 结构化 info 日志
///
/// `linfo!(request_id, stage, component, operation, message, key = value, ...)`
#[macro_export]
macro_rules! linfo {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            request_id = %$request_id,
            stage = $stage.as_str(),
            component = $component.as_str(),
            operation = $operation,
            $($($field)+ ,)?
            "{}",
            $message
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::warn!(
            request_id = %$request_id,
            stage = $stage.as_str(),
            component = $component.as_str(),
            operation = $operation,
            $($($field)+ ,)?
            "{}",
            $message
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::error!(
            request_id = %$request_id,
            stage = $stage.as_str(),
            component = $component.as_str(),
            operation = $operation,
            $($($field)+ ,)?
            "{}",
            $message
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $($field:tt)+)?) => {
        ::tracing::debug!(
            request_id = %$request_id,
            stage = $stage.as_str(),
            component = $component.as_str(),
            operation = $operation,
            $($($field)+ ,)?
            "{}",
            $message
        )
    };
}

/// 默认过滤规则：关闭 SQL 语句级日志
fn default_filter(level: &str) -> String {
    format!("{level},module_monitor=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先于 `log_level`。重复调用（例如测试中）不会 panic。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(
            rust_log = ?env::var("RUST_LOG").ok(),
            "📋 logging initialised"
        );
    }
}

/// 环境变量设置指南
pub fn print_logging_help() {
    println!("📋 日志配置指南:");
    println!("  RUST_LOG=info                           # 标准日志级别");
    println!("  RUST_LOG=debug                          # 调试级别");
    println!("  RUST_LOG=info,module_monitor=trace      # 编排器详细追踪");
    println!("  RUST_LOG=info,sqlx::query=info          # 开发环境：启用数据库查询日志");
}
