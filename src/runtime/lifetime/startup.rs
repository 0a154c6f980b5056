//! 启动阶段：按配置显式构造存储、缓存和身份提供方，再交给 actix 作为 app data

use actix_web::web;
use std::sync::Arc;
use tracing::warn;

use crate::cache::{ObjectCache, create_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::provider::{HttpIdentityProvider, IdentityProvider};
use crate::routes;
use crate::storage::{SeaOrmStorage, Storage};
use crate::utils::{json_error_handler, path_error_handler, query_error_handler};

#[derive(Clone)]
pub struct StartupContext {
    pub config: AppConfig,
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl StartupContext {
    /// 注册依赖、参数错误处理器和全部路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 设置查询参数错误处理器
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // 设置JSON错误处理器
            .app_data(web::PathConfig::default().error_handler(path_error_handler)) // 设置路径参数错误处理器
            .app_data(web::PayloadConfig::new(
                self.config.server.limits.max_payload_size,
            )) // 设置最大请求体大小
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.provider.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .configure(routes::configure_auth_routes) // 配置认证相关路由
            .configure(routes::configure_school_routes); // 配置学校相关路由
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    // 其他依赖可能已经安装过
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::connect(&config.database).await?);
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache(&config.cache);
    warn!("Cache backend '{}' ready", config.cache.cache_type);

    let provider: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(&config.provider)?);

    Ok(StartupContext {
        config: config.clone(),
        storage,
        cache,
        provider,
    })
}
