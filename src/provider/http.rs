use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{IdentityProvider, ProviderAccount, ProviderTokens, direct_download_url};
use crate::config::ProviderConfig;
use crate::errors::{Result, SchoolHubError};

/// 基于 HTTP 的提供方实现（接口形态与 Dropbox API v2 一致）
pub struct HttpIdentityProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct AccountName {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct AccountPayload {
    account_id: String,
    name: AccountName,
    email: String,
    profile_photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkPayload {
    url: String,
}

// 链接已存在时，提供方在错误体中返回已有链接；其余冲突属于提供方故障
fn existing_shared_link(path: &str, err: &serde_json::Value) -> Result<String> {
    match err
        .pointer("/error/shared_link_already_exists/metadata/url")
        .and_then(|v| v.as_str())
    {
        Some(url) => Ok(url.to_string()),
        None => {
            warn!("Sharing '{}' failed: {}", path, err);
            Err(SchoolHubError::provider(format!(
                "Attachment could not be shared: {path}"
            )))
        }
    }
}

impl HttpIdentityProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<ProviderTokens> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            debug!("Provider rejected token request: {}", body);
            return Err(SchoolHubError::authentication(
                "Authorization code or refresh token rejected",
            ));
        }
        let payload: TokenPayload = resp.error_for_status()?.json().await?;
        Ok(ProviderTokens {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_in: payload.expires_in,
        })
    }

    /// 带 Bearer 的 JSON POST，401 视为令牌失效
    async fn rpc(
        &self,
        url: &str,
        token: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let mut req = self.client.post(url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(SchoolHubError::authentication("Invalid or expired access token"));
        }
        Ok(resp)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("token_access_type", "offline"),
                ("state", state),
                ("redirect_uri", redirect_uri),
            ],
        )
        .map_err(|e| SchoolHubError::provider(format!("Invalid authorize url: {e}")))?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ProviderTokens> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        let mut tokens = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .await?;
        // 刷新响应不一定返回新的 refresh token
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }

    async fn current_account(&self, access_token: &str) -> Result<ProviderAccount> {
        let resp = self
            .rpc(&self.config.account_url, access_token, None)
            .await?;
        let payload: AccountPayload = resp.error_for_status()?.json().await?;
        Ok(ProviderAccount {
            subject: payload.account_id,
            display_name: payload.name.display_name,
            email: payload.email,
            avatar_url: payload.profile_photo_url,
        })
    }

    async fn share_file(&self, access_token: &str, path: &str) -> Result<String> {
        let body = json!({
            "path": path,
            "settings": { "requested_visibility": "public" },
        });
        let resp = self
            .rpc(&self.config.share_url, access_token, Some(body))
            .await?;

        if resp.status() == StatusCode::CONFLICT {
            let err: serde_json::Value = resp.json().await?;
            return existing_shared_link(path, &err);
        }

        let payload: LinkPayload = resp.error_for_status()?.json().await?;
        Ok(payload.url)
    }

    async fn resolve_link(&self, access_token: &str, shared_url: &str) -> Result<String> {
        let resp = self
            .rpc(
                &self.config.link_url,
                access_token,
                Some(json!({ "url": shared_url })),
            )
            .await?;
        if resp.status() == StatusCode::CONFLICT {
            return Err(SchoolHubError::not_found("Shared link no longer exists"));
        }
        let payload: LinkPayload = resp.error_for_status()?.json().await?;
        Ok(direct_download_url(&payload.url))
    }
}
