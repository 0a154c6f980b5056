use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::PostService;
use crate::errors::{Result, SchoolHubError};
use crate::models::ApiResponse;
use crate::models::posts::{
    access::can_view_post,
    entities::{Post, PostType},
    responses::{AttachmentLinkResponse, PostDetailResponse},
};
use crate::models::schools::entities::School;
use crate::services::{current_school, current_token};
use crate::storage::Storage;

/// 看不到的帖子和不存在的帖子一样返回 404
pub(crate) async fn load_visible_post(
    storage: &Arc<dyn Storage>,
    school: &School,
    user_id: i64,
    post_id: i64,
) -> Result<Post> {
    let post = storage
        .get_post(school.id, post_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("Post not found"))?;
    if !can_view_post(school, user_id, &post) {
        return Err(SchoolHubError::authorization("Post not visible"));
    }
    Ok(post)
}

pub async fn get_post(
    service: &PostService,
    request: &HttpRequest,
    post_id: i64,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;
    let post = load_visible_post(&storage, &school, member.user_id, post_id).await?;

    // 教职人员看到全部提交，学生只看到自己的
    let submissions = match post.post_type {
        PostType::Assignment if member.role.is_staff() => storage.list_submissions(post.id).await?,
        PostType::Assignment => storage
            .get_submission(post.id, member.user_id)
            .await?
            .into_iter()
            .collect(),
        _ => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PostDetailResponse { post, submissions },
        "Post retrieved successfully",
    )))
}

pub async fn get_attachment(
    service: &PostService,
    request: &HttpRequest,
    post_id: i64,
    index: usize,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;
    let post = load_visible_post(&storage, &school, member.user_id, post_id).await?;

    let attachment = post
        .attachments
        .get(index)
        .ok_or_else(|| SchoolHubError::not_found("Attachment not found"))?;

    let token = current_token(request)?;
    let url = service
        .get_provider(request)?
        .resolve_link(&token, &attachment.url)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttachmentLinkResponse {
            name: attachment.name.clone(),
            url,
        },
        "Attachment link resolved",
    )))
}
