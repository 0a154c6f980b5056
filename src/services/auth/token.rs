use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AuthService;
use crate::errors::SchoolHubError;
use crate::middlewares::require_auth::session_cache_key;
use crate::models::auth::{
    requests::{RefreshTokenRequest, TokenRequest},
    responses::{RefreshTokenResponse, TokenResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::StateToken;

pub async fn exchange_token(
    service: &AuthService,
    request: &HttpRequest,
    token_request: TokenRequest,
) -> ActixResult<HttpResponse> {
    if token_request.code.trim().is_empty() {
        return Err(SchoolHubError::validation("code must not be empty").into());
    }

    let config = service.get_config(request)?;
    let claims = match StateToken::verify(&config.provider.state_secret, &token_request.state) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("OAuth state rejected: {}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StateInvalid,
                "Invalid or expired state",
            )));
        }
    };

    let provider = service.get_provider(request)?;
    let tokens = match provider
        .exchange_code(token_request.code.trim(), &claims.redirect_uri)
        .await
    {
        Ok(tokens) => tokens,
        Err(SchoolHubError::Authentication(msg)) => {
            info!("Authorization code rejected by provider: {}", msg);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Authorization code rejected",
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let account = provider.current_account(&tokens.access_token).await?;
    let user = service.get_storage(request)?.upsert_user(&account).await?;

    // 登录成功后直接写入会话缓存
    let cache = service.get_cache(request)?;
    cache
        .insert_raw(
            session_cache_key(&tokens.access_token),
            serde_json::to_string(&user).map_err(SchoolHubError::from)?,
            0,
        )
        .await;

    info!("User {} signed in", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user,
        },
        "Login successful",
    )))
}

pub async fn refresh_token(
    service: &AuthService,
    request: &HttpRequest,
    refresh_request: RefreshTokenRequest,
) -> ActixResult<HttpResponse> {
    if refresh_request.refresh_token.trim().is_empty() {
        return Err(SchoolHubError::validation("refresh_token must not be empty").into());
    }

    let provider = service.get_provider(request)?;
    match provider.refresh(refresh_request.refresh_token.trim()).await {
        Ok(tokens) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token: tokens.access_token,
                expires_in: tokens.expires_in,
            },
            "Token refreshed",
        ))),
        Err(SchoolHubError::Authentication(msg)) => {
            info!("Refresh token rejected by provider: {}", msg);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Refresh token rejected",
            )))
        }
        Err(e) => Err(e.into()),
    }
}
