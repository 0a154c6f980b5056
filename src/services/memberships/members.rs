use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MembershipService;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::schools::entities::SchoolRole;
use crate::services::current_school;
use crate::services::schools::reload_view;

/// 管理员可以移除任何成员；其他成员只能退出学校。
/// 学校至少保留一名管理员。
pub async fn remove_member(
    service: &MembershipService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let leaving = member.user_id == user_id;
    if !leaving && member.role != SchoolRole::Administrator {
        return Err(SchoolHubError::authorization("Only administrators can remove members").into());
    }

    let target_role = school
        .role_of(user_id)
        .ok_or_else(|| SchoolHubError::not_found("Member not found"))?;
    if target_role == SchoolRole::Administrator && school.administrator_count() <= 1 {
        return Err(SchoolHubError::validation(
            "A school must keep at least one administrator",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    if !storage.remove_school_member(school.id, user_id).await? {
        return Err(SchoolHubError::not_found("Member not found").into());
    }
    info!("User {} removed from school {} by {}", user_id, school.id, member.user_id);

    if leaving {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Left school")));
    }
    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Member removed successfully",
    )))
}
