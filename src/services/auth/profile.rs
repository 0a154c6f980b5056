use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::models::ApiResponse;
use crate::models::auth::responses::UserInfoResponse;
use crate::services::current_user;

pub async fn get_profile(_service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved",
    )))
}
