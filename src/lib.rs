//! # Module Monitor Library
//!
//! 监控模块编排与状态缓存引擎

pub mod app;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
pub mod orchestrator;
pub mod probe;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{MonitorError, Result};
pub use orchestrator::{ModuleDescriptor, ModuleOrchestrator, OrchestratorSettings};
