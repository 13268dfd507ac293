//! # 缓存策略
//!
//! 定义缓存条目的生存时间

use std::time::Duration;

/// 缓存 TTL 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    /// 不缓存，每次都重新计算
    Disabled,
    /// 写入后经过指定时长过期
    Expires(Duration),
    /// 永不过期（进程重启或显式失效前一直有效）
    Indefinite,
}

impl CacheTtl {
    /// 由时长构造，零时长视为不缓存
    #[must_use]
    pub const fn from_duration(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Self::Disabled
        } else {
            Self::Expires(ttl)
        }
    }

    /// 从秒数创建 TTL，0 视为不缓存
    #[must_use]
    pub const fn from_seconds(seconds: u64) -> Self {
        Self::from_duration(Duration::from_secs(seconds))
    }

    /// 写入缓存时使用的过期时长，`None` 表示不过期
    ///
    /// 对 [`CacheTtl::Disabled`] 没有意义，调用方应先排除。
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Expires(ttl) => Some(*ttl),
            Self::Disabled | Self::Indefinite => None,
        }
    }

    /// 是否会写入缓存
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seconds_disables_caching() {
        assert_eq!(CacheTtl::from_seconds(0), CacheTtl::Disabled);
        assert!(!CacheTtl::from_seconds(0).is_cacheable());
    }

    #[test]
    fn positive_seconds_expire() {
        let ttl = CacheTtl::from_seconds(20);
        assert_eq!(ttl.as_duration(), Some(Duration::from_secs(20)));
        assert!(ttl.is_cacheable());
    }

    #[test]
    fn indefinite_has_no_expiry() {
        assert_eq!(CacheTtl::Indefinite.as_duration(), None);
        assert!(CacheTtl::Indefinite.is_cacheable());
    }
}
