use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::SchoolService;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::schools::{
    entities::{School, SchoolRole},
    responses::SchoolViewResponse,
    view::SchoolView,
};
use crate::services::current_school;
use crate::storage::Storage;

/// 视图及其中出现的用户资料，邮箱仅管理员可见
pub async fn school_view_response(
    storage: &Arc<dyn Storage>,
    school: &School,
    user_id: i64,
) -> Result<SchoolViewResponse> {
    let view = SchoolView::project(school, user_id)
        .ok_or_else(|| SchoolHubError::not_found("School not found"))?;
    let include_email = view.role == SchoolRole::Administrator;
    let users = storage
        .get_users_by_ids(&view.visible_user_ids())
        .await?
        .iter()
        .map(|u| u.profile(include_email))
        .collect();
    Ok(SchoolViewResponse {
        school: view,
        users,
    })
}

/// 修改后重新加载学校并生成视图
pub async fn reload_view(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    user_id: i64,
) -> Result<SchoolViewResponse> {
    let school = storage
        .get_school(school_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("School not found"))?;
    school_view_response(storage, &school, user_id).await
}

pub async fn get_school(service: &SchoolService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;
    let response = school_view_response(&storage, &school, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "School retrieved successfully",
    )))
}
