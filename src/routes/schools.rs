use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{memberships, posts};
use crate::middlewares;
use crate::models::schools::entities::SchoolRole;
use crate::models::schools::requests::{CreateNamedRequest, UpdateSyllabusRequest};
use crate::services::SchoolService;

static SCHOOL_SERVICE: SchoolService = SchoolService;

// HTTP处理程序
pub async fn list_schools(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(&req).await
}

pub async fn create_school(
    req: HttpRequest,
    school_data: web::Json<CreateNamedRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .create_school(&req, school_data.into_inner())
        .await
}

pub async fn get_school(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(&req).await
}

pub async fn create_year_group(
    req: HttpRequest,
    data: web::Json<CreateNamedRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .create_year_group(&req, data.into_inner())
        .await
}

pub async fn create_course(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    data: web::Json<CreateNamedRequest>,
) -> ActixResult<HttpResponse> {
    let (_, year_group_id) = path.into_inner();
    SCHOOL_SERVICE
        .create_course(&req, year_group_id, data.into_inner())
        .await
}

pub async fn update_syllabus(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    data: web::Json<UpdateSyllabusRequest>,
) -> ActixResult<HttpResponse> {
    let (_, course_id) = path.into_inner();
    SCHOOL_SERVICE
        .update_syllabus(&req, course_id, data.into_inner())
        .await
}

pub async fn create_class(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    data: web::Json<CreateNamedRequest>,
) -> ActixResult<HttpResponse> {
    let (_, course_id) = path.into_inner();
    SCHOOL_SERVICE
        .create_class(&req, course_id, data.into_inner())
        .await
}

// 配置路由
pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schools")
            .wrap(middlewares::RequireAuth)
            .service(
                web::resource("")
                    .route(web::get().to(list_schools))
                    .route(web::post().to(create_school)),
            )
            // 邀请处理发生在加入学校之前，不经过成员校验
            .configure(memberships::configure_invitation_routes)
            .service(
                web::scope("/{school_id}")
                    .wrap(middlewares::RequireSchoolRole::any_member())
                    .route("", web::get().to(get_school))
                    .route(
                        "/year-groups",
                        web::post()
                            .to(create_year_group)
                            .wrap(middlewares::RequireSchoolRole::new(SchoolRole::Administrator)),
                    )
                    .route(
                        "/year-groups/{year_group_id}/courses",
                        web::post()
                            .to(create_course)
                            .wrap(middlewares::RequireSchoolRole::new(SchoolRole::Administrator)),
                    )
                    .route(
                        "/courses/{course_id}/syllabus",
                        web::put().to(update_syllabus).wrap(
                            middlewares::RequireSchoolRole::new_any(&[
                                SchoolRole::Administrator,
                                SchoolRole::Teacher,
                            ]),
                        ),
                    )
                    .route(
                        "/courses/{course_id}/classes",
                        web::post().to(create_class).wrap(
                            middlewares::RequireSchoolRole::new_any(&[
                                SchoolRole::Administrator,
                                SchoolRole::Teacher,
                            ]),
                        ),
                    )
                    .configure(memberships::configure_membership_routes)
                    .configure(posts::configure_post_routes),
            ),
    );
}
