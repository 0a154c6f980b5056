//! 班级成员：学生申请入班，教师/管理员添加或批准，成员退出或取消申请

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MembershipService;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::schools::{
    entities::{ClassMemberStatus, SchoolRole},
    requests::AddClassMemberRequest,
};
use crate::services::current_school;
use crate::services::schools::reload_view;

pub async fn request_join_class(
    service: &MembershipService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    if member.role != SchoolRole::Student {
        return Err(SchoolHubError::authorization("Only students can request to join").into());
    }
    let (_, _, class) = school
        .find_class(class_id)
        .ok_or_else(|| SchoolHubError::not_found("Class not found"))?;
    if class.status_of(member.user_id).is_some() {
        return Err(SchoolHubError::validation(
            "Already a member of this class or awaiting approval",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    // 中间件加载的快照之后用户可能已离开学校
    if !storage
        .set_class_member(school.id, class_id, member.user_id, ClassMemberStatus::Pending)
        .await?
    {
        return Err(SchoolHubError::not_found("Not a member of this school").into());
    }
    info!("User {} requested to join class {}", member.user_id, class_id);

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Join request submitted",
    )))
}

/// 班级成员必须是本校成员：任课教师来自管理员和教师，学生来自学生
pub async fn add_class_member(
    service: &MembershipService,
    request: &HttpRequest,
    class_id: i64,
    data: AddClassMemberRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    if !school.can_manage_class(member.user_id, class_id) {
        return Err(SchoolHubError::authorization("Cannot manage this class").into());
    }

    let target_role = school
        .role_of(data.user_id)
        .ok_or_else(|| SchoolHubError::validation("User is not a member of this school"))?;
    if !data.status.allows_role(target_role) {
        return Err(SchoolHubError::validation(format!(
            "A school {} cannot be added to a class as {}",
            target_role,
            data.status.as_str()
        ))
        .into());
    }

    let storage = service.get_storage(request)?;
    if !storage
        .set_class_member(school.id, class_id, data.user_id, data.status)
        .await?
    {
        return Err(SchoolHubError::validation("User is not a member of this school").into());
    }
    info!(
        "User {} added to class {} as {}",
        data.user_id,
        class_id,
        data.status.as_str()
    );

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class member added successfully",
    )))
}

/// 管理者可移除任何班级成员；成员自己可退出或取消申请
pub async fn remove_class_member(
    service: &MembershipService,
    request: &HttpRequest,
    class_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let manages = school.can_manage_class(member.user_id, class_id);
    if !manages && member.user_id != user_id {
        return Err(SchoolHubError::authorization("Cannot manage this class").into());
    }

    let in_class = school
        .find_class(class_id)
        .is_some_and(|(_, _, class)| class.status_of(user_id).is_some());
    if !in_class {
        return Err(SchoolHubError::not_found("Class member not found").into());
    }

    let storage = service.get_storage(request)?;
    if !storage.remove_class_member(class_id, user_id).await? {
        return Err(SchoolHubError::not_found("Class member not found").into());
    }
    info!("User {} removed from class {} by {}", user_id, class_id, member.user_id);

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class member removed successfully",
    )))
}
