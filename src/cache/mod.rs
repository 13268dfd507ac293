//! # 缓存模块
//!
//! 进程内单飞结果缓存和 TTL 策略

pub mod result_cache;
pub mod strategies;

pub use result_cache::ResultCache;
pub use strategies::CacheTtl;
