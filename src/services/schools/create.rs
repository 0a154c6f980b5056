use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SchoolService, school_view_response};
use crate::models::ApiResponse;
use crate::models::schools::requests::CreateNamedRequest;
use crate::services::current_user;

/// 创建者成为该校管理员
pub async fn create_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_data: CreateNamedRequest,
) -> ActixResult<HttpResponse> {
    school_data.validate()?;
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let school = storage
        .create_school(&school_data.trimmed_name(), user.id)
        .await?;
    info!("School {} created by user {}", school.id, user.id);

    let response = school_view_response(&storage, &school, user.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "School created successfully",
    )))
}
