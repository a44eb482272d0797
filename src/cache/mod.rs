//! 对象缓存
//!
//! 后端以插件形式注册（`moka`、`redis`），启动时按 `cache.type` 选择，
//! 不可用时回退到进程内 moka。值统一以 JSON 字符串存取。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析，调用方按未命中处理并回源
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// JSON 序列化的便捷读写
#[async_trait]
pub trait ObjectCacheExt: ObjectCache {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::warn!("Cached value for '{}' is not valid JSON: {}", key, e);
                    self.remove(key).await;
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    async fn insert_json<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key.to_string(), raw, ttl).await,
            Err(e) => tracing::warn!("Failed to serialize cache value for '{}': {}", key, e),
        }
    }
}

impl<C: ObjectCache + ?Sized> ObjectCacheExt for C {}

/// 缓存键
pub mod keys {
    pub fn user_by_token(token: &str) -> String {
        format!("user:{token}")
    }

    pub fn current_holidays(academic_year: &str) -> String {
        format!("calendar:holidays:{academic_year}")
    }

    pub fn current_schedule(academic_year: &str) -> String {
        format!("calendar:schedule:{academic_year}")
    }
}

/// 在程序加载时把缓存后端注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
