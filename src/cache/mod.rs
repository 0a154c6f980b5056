//! 对象缓存
//!
//! 目前只用于缓存已通过身份提供方校验的会话用户。

pub mod object_cache;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::CacheConfig;
use object_cache::{moka::MokaCacheWrapper, redis::RedisObjectCache};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
}

/// 按配置创建缓存后端，Redis 不可用时回退到 Moka
pub fn create_cache(config: &CacheConfig) -> Arc<dyn ObjectCache> {
    match config.cache_type.as_str() {
        "redis" => match RedisObjectCache::new(config) {
            Ok(cache) => {
                info!("Using redis object cache");
                Arc::new(cache)
            }
            Err(e) => {
                warn!("Redis cache unavailable ({}), falling back to moka", e);
                Arc::new(MokaCacheWrapper::new(config))
            }
        },
        "moka" => Arc::new(MokaCacheWrapper::new(config)),
        other => {
            warn!("Unknown cache type '{}', using moka", other);
            Arc::new(MokaCacheWrapper::new(config))
        }
    }
}
