use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MembershipService;
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::schools::requests::InviteMembersRequest;
use crate::services::schools::{reload_view, school_view_response};
use crate::services::{current_school, current_user};
use crate::utils::validate::normalize_email;

pub async fn invite_members(
    service: &MembershipService,
    request: &HttpRequest,
    data: InviteMembersRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;

    let emails = data.normalized_emails();
    storage
        .add_invitations(school.id, &emails, data.role, member.user_id)
        .await?;
    info!(
        "{} invitation(s) as {} sent for school {}",
        emails.len(),
        data.role,
        school.id
    );

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Invitations sent successfully",
    )))
}

pub async fn accept_invitation(
    service: &MembershipService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let email = normalize_email(&user.email);

    let school = storage
        .get_school(school_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("Invitation not found"))?;
    if school.role_of(user.id).is_some() {
        storage.decline_invitation(school_id, &email).await?;
        return Err(SchoolHubError::validation("Already a member of this school").into());
    }

    let role = storage
        .accept_invitation(school_id, user.id, &email)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("Invitation not found"))?;
    info!("User {} joined school {} as {}", user.id, school_id, role);

    let school = storage
        .get_school(school_id)
        .await?
        .ok_or_else(|| SchoolHubError::not_found("School not found"))?;
    let response = school_view_response(&storage, &school, user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Invitation accepted",
    )))
}

pub async fn decline_invitation(
    service: &MembershipService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if !storage
        .decline_invitation(school_id, &normalize_email(&user.email))
        .await?
    {
        return Err(SchoolHubError::not_found("Invitation not found").into());
    }
    info!("User {} declined invitation to school {}", user.id, school_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Invitation declined")))
}
