use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::models::posts::requests::{
    CreatePostRequest, FeedQuery, RecordMarksRequest, SubmitAssignmentRequest,
};
use crate::services::PostService;

static POST_SERVICE: PostService = PostService;

pub async fn create_post(
    req: HttpRequest,
    post_data: web::Json<CreatePostRequest>,
) -> ActixResult<HttpResponse> {
    POST_SERVICE.create_post(&req, post_data.into_inner()).await
}

pub async fn list_feed(
    req: HttpRequest,
    query: web::Query<FeedQuery>,
) -> ActixResult<HttpResponse> {
    POST_SERVICE.list_feed(&req, query.into_inner()).await
}

pub async fn get_post(req: HttpRequest, path: web::Path<(i64, i64)>) -> ActixResult<HttpResponse> {
    let (_, post_id) = path.into_inner();
    POST_SERVICE.get_post(&req, post_id).await
}

pub async fn delete_post(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (_, post_id) = path.into_inner();
    POST_SERVICE.delete_post(&req, post_id).await
}

pub async fn get_attachment(
    req: HttpRequest,
    path: web::Path<(i64, i64, usize)>,
) -> ActixResult<HttpResponse> {
    let (_, post_id, index) = path.into_inner();
    POST_SERVICE.get_attachment(&req, post_id, index).await
}

pub async fn submit_assignment(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    submission: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let (_, post_id) = path.into_inner();
    POST_SERVICE
        .submit_assignment(&req, post_id, submission.into_inner())
        .await
}

pub async fn record_marks(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
    marks: web::Json<RecordMarksRequest>,
) -> ActixResult<HttpResponse> {
    let (_, post_id, student_id) = path.into_inner();
    POST_SERVICE
        .record_marks(&req, post_id, student_id, marks.into_inner())
        .await
}

// 帖子路由，挂在 /api/v1/schools/{school_id} 下
pub fn configure_post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(list_feed))
            .route(web::post().to(create_post)),
    )
    .service(
        web::resource("/posts/{post_id}")
            .route(web::get().to(get_post))
            .route(web::delete().to(delete_post)),
    )
    .route(
        "/posts/{post_id}/submission",
        web::put().to(submit_assignment),
    )
    .route(
        "/posts/{post_id}/submissions/{student_id}/marks",
        web::put().to(record_marks),
    )
    .route(
        "/posts/{post_id}/attachments/{index}",
        web::get().to(get_attachment),
    );
}
