use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PostService;
use super::get::load_visible_post;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::posts::access::can_delete_post;
use crate::services::current_school;

pub async fn delete_post(
    service: &PostService,
    request: &HttpRequest,
    post_id: i64,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;
    let post = load_visible_post(&storage, &school, member.user_id, post_id).await?;

    if !can_delete_post(&school, member.user_id, &post) {
        return Err(SchoolHubError::authorization("Cannot delete this post").into());
    }
    if !storage.delete_post(post.id).await? {
        return Err(SchoolHubError::not_found("Post not found").into());
    }
    info!("Post {} deleted by {}", post.id, member.user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Post deleted successfully")))
}
