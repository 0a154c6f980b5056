use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::auth::requests::{AuthorizeQuery, RefreshTokenRequest, TokenRequest};
use crate::services::AuthService;

static AUTH_SERVICE: AuthService = AuthService;

pub async fn authorize(
    req: HttpRequest,
    query: web::Query<AuthorizeQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.authorize(&req, query.into_inner()).await
}

pub async fn exchange_token(
    req: HttpRequest,
    token_data: web::Json<TokenRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .exchange_token(&req, token_data.into_inner())
        .await
}

pub async fn refresh_token(
    req: HttpRequest,
    refresh_data: web::Json<RefreshTokenRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .refresh_token(&req, refresh_data.into_inner())
        .await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_profile(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/authorize", web::get().to(authorize))
            .route("/token", web::post().to(exchange_token))
            .route("/refresh", web::post().to(refresh_token))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireAuth)
                    .route("/me", web::get().to(get_user)),
            ),
    );
}
