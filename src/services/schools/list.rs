use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::ApiResponse;
use crate::models::schools::responses::SchoolListResponse;
use crate::services::current_user;
use crate::utils::validate::normalize_email;

pub async fn list_schools(
    service: &SchoolService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let schools = storage.list_user_schools(user.id).await?;
    let invitations = storage
        .list_invitations_for_email(&normalize_email(&user.email))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SchoolListResponse {
            schools,
            invitations,
        },
        "Schools retrieved successfully",
    )))
}
