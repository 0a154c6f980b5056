//! 第三方身份 / 文件共享提供方
//!
//! 登录走 OAuth 授权码流程；之后客户端携带的 Bearer 令牌就是提供方的 access token，
//! 每次校验都以能否取到提供方账户为准。附件存放在作者自己的网盘中，
//! 发帖时生成共享链接。

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use http::HttpIdentityProvider;
pub use mock::MockIdentityProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// 秒
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAccount {
    /// 提供方账户 ID，对应 `users.auth_subject`
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 浏览器跳转的授权地址
    fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<String>;

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ProviderTokens>;

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens>;

    /// 令牌无效时返回 `Authentication` 错误
    async fn current_account(&self, access_token: &str) -> Result<ProviderAccount>;

    /// 为网盘中的文件生成共享链接
    async fn share_file(&self, access_token: &str, path: &str) -> Result<String>;

    /// 把共享链接解析成可直接下载的地址
    async fn resolve_link(&self, access_token: &str, shared_url: &str) -> Result<String>;
}

/// 共享链接转成直接下载链接（`dl=1`）
pub(crate) fn direct_download_url(shared_url: &str) -> String {
    if shared_url.contains("dl=0") {
        shared_url.replacen("dl=0", "dl=1", 1)
    } else if shared_url.contains("dl=1") {
        shared_url.to_string()
    } else if shared_url.contains('?') {
        format!("{shared_url}&dl=1")
    } else {
        format!("{shared_url}?dl=1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_download_url() {
        assert_eq!(
            direct_download_url("https://share.test/s/abc/a.pdf?dl=0"),
            "https://share.test/s/abc/a.pdf?dl=1"
        );
        assert_eq!(
            direct_download_url("https://share.test/s/abc/a.pdf"),
            "https://share.test/s/abc/a.pdf?dl=1"
        );
        assert_eq!(
            direct_download_url("https://share.test/s/abc?rlkey=x"),
            "https://share.test/s/abc?rlkey=x&dl=1"
        );
    }
}
