use config::{Config, ConfigError, Environment, File};

use super::AppConfig;

impl AppConfig {
    /// 加载配置
    ///
    /// 优先级（低 → 高）：内置默认值、`config.toml`、`config.<APP_ENV>.toml`、
    /// `SCHOOLHUB_*` 环境变量、常用的独立环境变量。
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("app.system_name", "SchoolHub")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.unix_socket_path", "")?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 16)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 1_048_576)?
            .set_default("database.url", "schoolhub.db")?
            .set_default("database.pool_size", 8)?
            .set_default("database.timeout", 10)?
            .set_default("cache.type", "moka")?
            .set_default("cache.default_ttl", 300)?
            .set_default("cache.redis.url", "redis://127.0.0.1:6379")?
            .set_default("cache.redis.key_prefix", "schoolhub:")?
            .set_default("cache.memory.max_capacity", 10_000)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("cors.max_age", 3600)?
            .set_default(
                "provider.authorize_url",
                "https://www.dropbox.com/oauth2/authorize",
            )?
            .set_default("provider.token_url", "https://api.dropboxapi.com/oauth2/token")?
            .set_default(
                "provider.account_url",
                "https://api.dropboxapi.com/2/users/get_current_account",
            )?
            .set_default(
                "provider.share_url",
                "https://api.dropboxapi.com/2/sharing/create_shared_link_with_settings",
            )?
            .set_default(
                "provider.link_url",
                "https://api.dropboxapi.com/2/sharing/get_shared_link_metadata",
            )?
            .set_default("provider.client_id", "")?
            .set_default("provider.state_ttl", 600)?
            .set_default("provider.request_timeout", 15)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "provider.client_id",
                std::env::var("PROVIDER_CLIENT_ID").ok(),
            )?
            .set_override_option(
                "provider.client_secret",
                std::env::var("PROVIDER_CLIENT_SECRET").ok(),
            )?
            .set_override_option("provider.state_secret", std::env::var("STATE_SECRET").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        if app_config.provider.state_secret.is_empty() {
            return Err(ConfigError::Message(
                "provider.state_secret (STATE_SECRET) must be set".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}
