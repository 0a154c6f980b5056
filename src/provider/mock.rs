//! 内存中的提供方实现，用于测试和本地开发

use async_trait::async_trait;
use dashmap::DashMap;

use super::{IdentityProvider, ProviderAccount, ProviderTokens, direct_download_url};
use crate::errors::{Result, SchoolHubError};

pub const MOCK_SHARE_HOST: &str = "https://share.mock.local";

#[derive(Default)]
pub struct MockIdentityProvider {
    /// access token -> 账户
    accounts: DashMap<String, ProviderAccount>,
    /// 授权码 -> access token
    codes: DashMap<String, String>,
    /// refresh token -> access token
    refresh_tokens: DashMap<String, String>,
    fail_sharing: bool,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文件共享总是失败
    pub fn with_failing_sharing() -> Self {
        Self {
            fail_sharing: true,
            ..Self::default()
        }
    }

    /// 注册一个账户，登录时可用 `code-<token>` 换取 `<token>`
    pub fn add_account(&self, access_token: &str, account: ProviderAccount) {
        self.codes
            .insert(format!("code-{access_token}"), access_token.to_string());
        self.refresh_tokens
            .insert(format!("refresh-{access_token}"), access_token.to_string());
        self.accounts.insert(access_token.to_string(), account);
    }

    pub fn add_user(&self, access_token: &str, subject: &str, display_name: &str, email: &str) {
        self.add_account(
            access_token,
            ProviderAccount {
                subject: subject.to_string(),
                display_name: display_name.to_string(),
                email: email.to_string(),
                avatar_url: None,
            },
        );
    }

    pub fn revoke(&self, access_token: &str) {
        self.accounts.remove(access_token);
    }

    fn tokens_for(access_token: &str) -> ProviderTokens {
        ProviderTokens {
            access_token: access_token.to_string(),
            refresh_token: Some(format!("refresh-{access_token}")),
            expires_in: 14_400,
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<String> {
        Ok(format!(
            "https://auth.mock.local/authorize?state={state}&redirect_uri={redirect_uri}"
        ))
    }

    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> Result<ProviderTokens> {
        let token = self
            .codes
            .get(code)
            .map(|t| t.value().clone())
            .ok_or_else(|| SchoolHubError::authentication("Unknown authorization code"))?;
        Ok(Self::tokens_for(&token))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        let token = self
            .refresh_tokens
            .get(refresh_token)
            .map(|t| t.value().clone())
            .ok_or_else(|| SchoolHubError::authentication("Unknown refresh token"))?;
        Ok(Self::tokens_for(&token))
    }

    async fn current_account(&self, access_token: &str) -> Result<ProviderAccount> {
        self.accounts
            .get(access_token)
            .map(|a| a.value().clone())
            .ok_or_else(|| SchoolHubError::authentication("Invalid or expired access token"))
    }

    async fn share_file(&self, access_token: &str, path: &str) -> Result<String> {
        let account = self.current_account(access_token).await?;
        if self.fail_sharing {
            return Err(SchoolHubError::provider("Mock sharing failure"));
        }
        Ok(format!(
            "{MOCK_SHARE_HOST}/{}{}?dl=0",
            account.subject,
            path
        ))
    }

    async fn resolve_link(&self, access_token: &str, shared_url: &str) -> Result<String> {
        self.current_account(access_token).await?;
        if !shared_url.starts_with(MOCK_SHARE_HOST) {
            return Err(SchoolHubError::not_found("Shared link no longer exists"));
        }
        Ok(direct_download_url(shared_url))
    }
}
