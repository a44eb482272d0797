use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::{AppConfig, CacheConfig};
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 值附带写入时指定的 TTL（秒），0 表示使用默认值
type Entry = (String, u64);

struct PerEntryTtl {
    default_ttl: Duration,
}

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(match value.1 {
            0 => self.default_ttl,
            secs => Duration::from_secs(secs),
        })
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, Entry>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        Ok(Self::with_config(&AppConfig::get().cache))
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .expire_after(PerEntryTtl {
                default_ttl: Duration::from_secs(config.default_ttl),
            })
            .build();
        debug!(
            "Moka cache ready (capacity {}, default ttl {}s)",
            config.memory.max_capacity, config.default_ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some((value, _)) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        self.inner.insert(key, (value, ttl)).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCacheExt;
    use crate::config::{MemoryConfig, RedisConfig};

    fn config() -> CacheConfig {
        CacheConfig {
            cache_type: "moka".into(),
            default_ttl: 60,
            redis: RedisConfig {
                url: "redis://127.0.0.1/".into(),
                key_prefix: "schoolhub:".into(),
                pool_size: 1,
            },
            memory: MemoryConfig { max_capacity: 100 },
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_config(&config());
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);

        cache.insert_raw("user:abc".into(), "{}".into(), 0).await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::Found("{}".into()));

        cache.remove("user:abc").await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MokaCacheWrapper::with_config(&config());
        cache.insert_json("years", &vec!["2024-2025"], 0).await;
        let years: CacheResult<Vec<String>> = cache.get_json("years").await;
        assert_eq!(years, CacheResult::Found(vec!["2024-2025".to_string()]));

        cache.insert_raw("broken".into(), "not json".into(), 0).await;
        let broken: CacheResult<Vec<String>> = cache.get_json("broken").await;
        assert_eq!(broken, CacheResult::ExistsButNoValue);
        assert_eq!(cache.get_raw("broken").await, CacheResult::NotFound);
    }
}
