/*!
 * 学校成员校验中间件
 *
 * 必须在 RequireAuth 之后使用。根据路径中的 `school_id` 加载学校，
 * 校验当前用户是该校成员且角色符合要求，然后把学校和成员关系放入请求扩展。
 * 不是成员或角色不符时统一返回 404，不暴露学校是否存在。
 *
 * ```rust,ignore
 * web::scope("/{school_id}")
 *     .wrap(RequireSchoolRole::any_member())
 *     .route("/year-groups", web::post().to(create_year_group)
 *         .wrap(RequireSchoolRole::new(SchoolRole::Administrator)))
 * ```
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
use tracing::debug;

use super::create_error_response;
use crate::errors::SchoolHubError;
use crate::models::{
    ErrorCode,
    schools::entities::{School, SchoolMember, SchoolRole},
    users::entities::User,
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct RequireSchoolRole {
    /// 为空表示任意成员
    allowed_roles: Vec<SchoolRole>,
}

impl RequireSchoolRole {
    pub fn any_member() -> Self {
        Self {
            allowed_roles: Vec::new(),
        }
    }

    pub fn new(role: SchoolRole) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    pub fn new_any(roles: &[SchoolRole]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSchoolRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSchoolRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSchoolRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireSchoolRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<SchoolRole>,
}

impl<S, B> Service<ServiceRequest> for RequireSchoolRoleMiddleware<S>
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
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            // 1. 校验用户信息
            let user_id_opt = req.extensions().get::<User>().map(|u| u.id);
            let user_id = match user_id_opt {
                Some(id) => id,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Unauthorized: missing user",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 2. 校验 school_id，非数字与不存在一样处理
            let school_id = match req
                .match_info()
                .get("school_id")
                .and_then(|s| s.parse::<i64>().ok())
            {
                Some(id) => id,
                None => return Ok(not_found(req)),
            };

            // 3. 加载学校
            let school = match load_school(&req, school_id).await {
                Ok(Some(school)) => school,
                Ok(None) => return Ok(not_found(req)),
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };

            // 4. 判断成员角色
            let role = match school.role_of(user_id) {
                Some(role) if allowed_roles.is_empty() || allowed_roles.contains(&role) => role,
                _ => {
                    debug!("User {} lacks a permitted role in school {}", user_id, school_id);
                    return Ok(not_found(req));
                }
            };

            req.extensions_mut().insert(SchoolMember { user_id, role });
            req.extensions_mut().insert(school);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

fn not_found<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(
        create_error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Resource not found",
        )
        .map_into_right_body(),
    )
}

async fn load_school(req: &ServiceRequest, school_id: i64) -> Result<Option<School>, SchoolHubError> {
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| SchoolHubError::database_connection("Storage not found in app data"))?;
    storage.get_school(school_id).await
}

// 辅助函数：从请求中提取学校信息
impl RequireSchoolRole {
    /// 此函数应该在应用了 RequireSchoolRole 中间件的路由处理程序中使用
    pub fn extract_school(req: &actix_web::HttpRequest) -> Option<School> {
        req.extensions().get::<School>().cloned()
    }

    pub fn extract_member(req: &actix_web::HttpRequest) -> Option<SchoolMember> {
        req.extensions().get::<SchoolMember>().cloned()
    }
}
