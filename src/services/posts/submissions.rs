//! 作业提交与评分

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PostService;
use super::create::share_attachments;
use super::get::load_visible_post;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::posts::{
    entities::PostType,
    requests::{RecordMarksRequest, SubmitAssignmentRequest},
};
use crate::models::schools::entities::SchoolRole;
use crate::services::{current_school, current_token};

/// 重复提交会覆盖上一次的内容
pub async fn submit_assignment(
    service: &PostService,
    request: &HttpRequest,
    post_id: i64,
    submission: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    submission.validate()?;
    let (school, member) = current_school(request)?;
    if member.role != SchoolRole::Student {
        return Err(SchoolHubError::authorization("Only students can submit").into());
    }

    let storage = service.get_storage(request)?;
    let post = load_visible_post(&storage, &school, member.user_id, post_id).await?;
    if post.post_type != PostType::Assignment {
        return Err(SchoolHubError::validation("This post is not an assignment").into());
    }

    let token = current_token(request)?;
    let provider = service.get_provider(request)?;
    let attachments = share_attachments(&provider, &token, &submission.attachments).await?;

    let content = submission
        .content
        .filter(|c| !c.trim().is_empty());
    let saved = storage
        .upsert_submission(post.id, member.user_id, content, attachments)
        .await?;
    info!("User {} submitted assignment {}", member.user_id, post.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Submission saved successfully")))
}

pub async fn record_marks(
    service: &PostService,
    request: &HttpRequest,
    post_id: i64,
    student_id: i64,
    marks: RecordMarksRequest,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    if !member.role.is_staff() {
        return Err(SchoolHubError::authorization("Only staff can record marks").into());
    }

    let storage = service.get_storage(request)?;
    let post = load_visible_post(&storage, &school, member.user_id, post_id).await?;
    let criteria = match (post.post_type, &post.marking_criteria) {
        (PostType::Assignment, Some(criteria)) => criteria,
        _ => return Err(SchoolHubError::validation("This post is not an assignment").into()),
    };
    marks.validate_against(criteria)?;

    let saved = storage
        .record_marks(post.id, student_id, &marks.marks, marks.feedback, member.user_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("Submission not found"))?;
    info!(
        "Marks recorded for student {} on assignment {} by {}",
        student_id, post.id, member.user_id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Marks recorded successfully")))
}
