//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod monitoring_modules;

pub use monitoring_modules::Entity as MonitoringModules;
