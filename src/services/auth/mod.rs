pub mod authorize;
pub mod profile;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use crate::models::auth::requests::{AuthorizeQuery, RefreshTokenRequest, TokenRequest};
use crate::provider::IdentityProvider;
use crate::storage::Storage;

pub struct AuthService;

impl AuthService {
    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::app_data::<dyn Storage>(request, "Storage")
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Result<Arc<dyn ObjectCache>> {
        super::app_data::<dyn ObjectCache>(request, "Cache")
    }

    pub(crate) fn get_provider(&self, request: &HttpRequest) -> Result<Arc<dyn IdentityProvider>> {
        super::app_data::<dyn IdentityProvider>(request, "Identity provider")
    }

    pub(crate) fn get_config<'a>(&self, request: &'a HttpRequest) -> Result<&'a AppConfig> {
        request
            .app_data::<web::Data<AppConfig>>()
            .map(|data| data.get_ref())
            .ok_or_else(|| SchoolHubError::database_config("Config not found in app data"))
    }

    // 生成授权地址和 state
    pub async fn authorize(
        &self,
        request: &HttpRequest,
        query: AuthorizeQuery,
    ) -> ActixResult<HttpResponse> {
        authorize::authorize(self, request, query).await
    }

    // 授权码换取令牌
    pub async fn exchange_token(
        &self,
        request: &HttpRequest,
        token_request: TokenRequest,
    ) -> ActixResult<HttpResponse> {
        token::exchange_token(self, request, token_request).await
    }

    // 刷新令牌
    pub async fn refresh_token(
        &self,
        request: &HttpRequest,
        refresh_request: RefreshTokenRequest,
    ) -> ActixResult<HttpResponse> {
        token::refresh_token(self, request, refresh_request).await
    }

    // 当前用户信息
    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_profile(self, request).await
    }
}
