use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::PostService;
use crate::models::posts::{access::FeedScope, requests::FeedQuery};
use crate::models::{ApiResponse, CursorPage};
use crate::services::current_school;

/// 多取一条用于判断是否还有下一页
pub async fn list_feed(
    service: &PostService,
    request: &HttpRequest,
    query: FeedQuery,
) -> ActixResult<HttpResponse> {
    let (school, member) = current_school(request)?;
    let class_ids = query.parsed_class_ids()?;
    let scope = FeedScope::resolve(
        &school,
        member.user_id,
        query.year_group_id,
        query.course_id,
        class_ids,
    )?;

    let cursor = query.cursor();
    let limit = cursor.effective_limit();
    let storage = service.get_storage(request)?;
    let posts = storage
        .list_feed(&scope, cursor.upper_bound(), limit + 1)
        .await?;
    debug!("Feed probe returned {} row(s) for limit {}", posts.len(), limit);

    let page = CursorPage::from_probe(posts, limit);
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Feed retrieved successfully")))
}
