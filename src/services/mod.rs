pub mod auth;
pub mod memberships;
pub mod posts;
pub mod schools;

pub use auth::AuthService;
pub use memberships::MembershipService;
pub use posts::PostService;
pub use schools::SchoolService;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::errors::{Result, SchoolHubError};
use crate::middlewares::{RequireAuth, RequireSchoolRole};
use crate::models::schools::entities::{School, SchoolMember};
use crate::models::users::entities::User;

/// 从 app data 中取出启动时注入的依赖
pub(crate) fn app_data<T: ?Sized + 'static>(request: &HttpRequest, name: &str) -> Result<Arc<T>> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| SchoolHubError::database_connection(format!("{name} not found in app data")))
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireAuth::extract_user(request)
        .ok_or_else(|| SchoolHubError::authentication("Unauthorized: missing user"))
}

pub(crate) fn current_token(request: &HttpRequest) -> Result<String> {
    RequireAuth::extract_token(request)
        .ok_or_else(|| SchoolHubError::authentication("Unauthorized: missing token"))
}

/// RequireSchoolRole 放入的学校和当前成员
pub(crate) fn current_school(request: &HttpRequest) -> Result<(School, SchoolMember)> {
    match (
        RequireSchoolRole::extract_school(request),
        RequireSchoolRole::extract_member(request),
    ) {
        (Some(school), Some(member)) => Ok((school, member)),
        _ => Err(SchoolHubError::not_found("School not found")),
    }
}
