/*!
 * Bearer 令牌认证中间件
 *
 * 客户端携带的 Bearer 令牌是身份提供方签发的 access token。
 * 中间件先查会话缓存（`session:<token>`），未命中时向提供方查询账户，
 * 并同步本地用户资料，然后把用户写入缓存。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/schools")
 *     .wrap(RequireAuth)
 *     .route("", web::get().to(list_schools))
 * ```
 *
 * 处理程序中：
 *
 * ```rust,ignore
 * let user = RequireAuth::extract_user(&req);
 * let token = RequireAuth::extract_token(&req);
 * ```
 *
 * 令牌缺失或无效时返回 401。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::errors::SchoolHubError;
use crate::models::{ErrorCode, users::entities::User};
use crate::provider::IdentityProvider;
use crate::storage::Storage;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 当前请求的提供方 access token，附件共享和链接解析时需要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[derive(Clone)]
pub struct RequireAuth;

pub(crate) fn session_cache_key(token: &str) -> String {
    format!("session:{token}")
}

enum AuthFailure {
    Unauthorized(String),
    Internal(SchoolHubError),
}

fn app_data<T: ?Sized + 'static>(req: &ServiceRequest, name: &str) -> Result<Arc<T>, AuthFailure> {
    req.app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            AuthFailure::Internal(SchoolHubError::database_connection(format!(
                "{name} not found in app data"
            )))
        })
}

// 辅助函数：提取并校验 Bearer 令牌
async fn authenticate(req: &ServiceRequest) -> Result<(User, String), AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
        })?
        .to_string();

    let cache = app_data::<dyn ObjectCache>(req, "Cache")?;
    let key = session_cache_key(&token);

    // 从缓存中获取已校验的用户
    match cache.get_raw(&key).await {
        CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
            Ok(user) => return Ok((user, token)),
            Err(_) => {
                cache.remove(&key).await;
                info!("Failed to deserialize cached session user");
            }
        },
        _ => debug!("Session not found in cache"),
    }

    let provider = app_data::<dyn IdentityProvider>(req, "Identity provider")?;
    let account = provider
        .current_account(&token)
        .await
        .map_err(|err| match err {
            SchoolHubError::Authentication(msg) => AuthFailure::Unauthorized(msg),
            other => AuthFailure::Internal(other),
        })?;

    let storage = app_data::<dyn Storage>(req, "Storage")?;
    let user = storage
        .upsert_user(&account)
        .await
        .map_err(AuthFailure::Internal)?;

    // 将用户信息存入缓存，使用默认 TTL
    if let Ok(user_json) = serde_json::to_string(&user) {
        cache.insert_raw(key, user_json, 0).await;
    }

    Ok((user, token))
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok((user, token)) => {
                    debug!("Authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(BearerToken(token));
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(AuthFailure::Unauthorized(err)) => {
                    info!("Authentication failed for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(AuthFailure::Internal(err)) => {
                    warn!("Authentication aborted for request to {}", req.path());
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

// 辅助函数：从请求中提取认证信息
impl RequireAuth {
    /// 此函数应该在应用了 RequireAuth 中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.extensions().get::<BearerToken>().map(|t| t.0.clone())
    }
}
