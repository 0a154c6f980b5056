use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::schools::entities::SchoolRole;
use crate::models::schools::requests::{AddClassMemberRequest, InviteMembersRequest};
use crate::services::MembershipService;

static MEMBERSHIP_SERVICE: MembershipService = MembershipService;

pub async fn invite_members(
    req: HttpRequest,
    data: web::Json<InviteMembersRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .invite_members(&req, data.into_inner())
        .await
}

pub async fn accept_invitation(
    req: HttpRequest,
    school_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .accept_invitation(&req, school_id.into_inner())
        .await
}

pub async fn decline_invitation(
    req: HttpRequest,
    school_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .decline_invitation(&req, school_id.into_inner())
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (_, user_id) = path.into_inner();
    MEMBERSHIP_SERVICE.remove_member(&req, user_id).await
}

pub async fn request_join_class(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (_, class_id) = path.into_inner();
    MEMBERSHIP_SERVICE.request_join_class(&req, class_id).await
}

pub async fn add_class_member(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    data: web::Json<AddClassMemberRequest>,
) -> ActixResult<HttpResponse> {
    let (_, class_id) = path.into_inner();
    MEMBERSHIP_SERVICE
        .add_class_member(&req, class_id, data.into_inner())
        .await
}

pub async fn remove_class_member(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (_, class_id, user_id) = path.into_inner();
    MEMBERSHIP_SERVICE
        .remove_class_member(&req, class_id, user_id)
        .await
}

// 不要求成员身份的邀请处理路由，挂在 /api/v1/schools 下
pub fn configure_invitation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/{school_id}/invitation/accept",
        web::post().to(accept_invitation),
    )
    .route(
        "/{school_id}/invitation/decline",
        web::post().to(decline_invitation),
    );
}

// 成员路由，挂在 /api/v1/schools/{school_id} 下
pub fn configure_membership_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/invitations",
        web::post()
            .to(invite_members)
            .wrap(middlewares::RequireSchoolRole::new(SchoolRole::Administrator)),
    )
    // 管理员移除成员，或成员自己退出
    .route("/members/{user_id}", web::delete().to(remove_member))
    .route(
        "/classes/{class_id}/requests",
        web::post().to(request_join_class),
    )
    .route(
        "/classes/{class_id}/members",
        web::post().to(add_class_member),
    )
    .route(
        "/classes/{class_id}/members/{user_id}",
        web::delete().to(remove_class_member),
    );
}
