use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::AuthService;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::auth::{requests::AuthorizeQuery, responses::AuthorizeResponse};
use crate::utils::jwt::StateToken;

pub async fn authorize(
    service: &AuthService,
    request: &HttpRequest,
    query: AuthorizeQuery,
) -> ActixResult<HttpResponse> {
    let redirect_uri = query.redirect_uri.trim();
    match reqwest::Url::parse(redirect_uri) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return Err(SchoolHubError::validation("redirect_uri must be an http(s) URL").into()),
    }

    let config = service.get_config(request)?;
    let state = StateToken::issue(
        &config.provider.state_secret,
        redirect_uri,
        config.provider.state_ttl,
    )
    .map_err(|e| SchoolHubError::serialization(format!("Failed to issue state: {e}")))?;

    let authorize_url = service
        .get_provider(request)?
        .authorize_url(&state, redirect_uri)?;

    debug!("Issued OAuth state for redirect {}", redirect_uri);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AuthorizeResponse {
            authorize_url,
            state,
        },
        "Authorization URL generated",
    )))
}
