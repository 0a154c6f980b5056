use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::info;

use super::PostService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::posts::{
    access::authorize_new_post,
    entities::Attachment,
    requests::{AttachmentInput, CreatePostRequest},
};
use crate::provider::IdentityProvider;
use crate::services::{current_school, current_token};

/// 并发为每个附件生成共享链接，任一失败则整体失败
pub(crate) async fn share_attachments(
    provider: &Arc<dyn IdentityProvider>,
    token: &str,
    inputs: &[AttachmentInput],
) -> Result<Vec<Attachment>> {
    try_join_all(inputs.iter().map(|input| async move {
        let url = provider.share_file(token, input.path.trim()).await?;
        Ok::<_, crate::errors::SchoolHubError>(Attachment {
            name: input.name.trim().to_string(),
            path: input.path.trim().to_string(),
            url,
        })
    }))
    .await
}

pub async fn create_post(
    service: &PostService,
    request: &HttpRequest,
    post_data: CreatePostRequest,
) -> ActixResult<HttpResponse> {
    post_data.validate()?;
    let (school, member) = current_school(request)?;
    authorize_new_post(&school, member.user_id, &post_data)?;

    let token = current_token(request)?;
    let provider = service.get_provider(request)?;
    let attachments = share_attachments(&provider, &token, &post_data.attachments).await?;

    let storage = service.get_storage(request)?;
    let post = storage
        .create_post(school.id, member.user_id, &post_data, attachments)
        .await?;
    info!(
        "Post {} ({}) created in school {} by {}",
        post.id,
        post.post_type.as_str(),
        school.id,
        member.user_id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(post, "Post created successfully")))
}
