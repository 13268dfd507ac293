//! # 结果缓存
//!
//! 带逐条过期时间的键值记忆化缓存，同一个键的并发请求只触发一次计算（single-flight）。
//! 过期检查发生在读取时；容量上限由 moka 的淘汰策略保证，不影响单飞语义。

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

use super::CacheTtl;

/// 缓存条目，携带自身的存活时长
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    ttl: Option<Duration>,
}

/// 按条目 TTL 计算过期时间
struct EntryExpiry;

impl<K, V> Expiry<K, CacheEntry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        entry: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// 单飞结果缓存
pub struct ResultCache<K, V> {
    inner: Cache<K, CacheEntry<V>>,
}

impl<K, V> ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// 创建缓存，`max_capacity` 为最大条目数
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();
        Self { inner }
    }

    /// 读取存活条目，否则执行 `compute` 并按 `ttl` 写入
    ///
    /// 同一个键的并发调用者共享同一次计算的结果或失败。失败不会写入缓存，
    /// 下一次调用会重新计算。[`CacheTtl::Disabled`] 时每次都直接计算。
    pub async fn get_or_compute<F, E>(&self, key: K, ttl: CacheTtl, compute: F) -> Result<V, Arc<E>>
    where
        F: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        if !ttl.is_cacheable() {
            return compute.await.map_err(Arc::new);
        }

        let lifetime = ttl.as_duration();
        self.inner
            .try_get_with(key, async move {
                compute
                    .await
                    .map(|value| CacheEntry { value, ttl: lifetime })
            })
            .await
            .map(|entry| entry.value)
    }

    /// 读取存活条目
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    /// 直接写入一个条目（覆盖旧值并重置过期时间）
    pub async fn insert(&self, key: K, value: V, ttl: CacheTtl) {
        if ttl.is_cacheable() {
            let entry = CacheEntry {
                value,
                ttl: ttl.as_duration(),
            };
            self.inner.insert(key, entry).await;
        }
    }

    /// 使单个条目失效
    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
    }
}
