//! 年级、课程、班级的创建与课程大纲维护

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SchoolService, reload_view};
use crate::errors::SchoolHubError;
use crate::models::ApiResponse;
use crate::models::schools::{
    entities::SchoolRole,
    requests::{CreateNamedRequest, UpdateSyllabusRequest},
};
use crate::services::current_school;

pub async fn create_year_group(
    service: &SchoolService,
    request: &HttpRequest,
    data: CreateNamedRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    let storage = service.get_storage(request)?;

    let year_group = storage
        .create_year_group(school.id, &data.trimmed_name())
        .await?;
    info!("Year group {} created in school {}", year_group.id, school.id);

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "Year group created successfully",
    )))
}

pub async fn create_course(
    service: &SchoolService,
    request: &HttpRequest,
    year_group_id: i64,
    data: CreateNamedRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    if school.find_year_group(year_group_id).is_none() {
        return Err(SchoolHubError::not_found("Year group not found").into());
    }
    let storage = service.get_storage(request)?;

    let course = storage
        .create_course(school.id, year_group_id, &data.trimmed_name())
        .await?;
    info!("Course {} created in year group {}", course.id, year_group_id);

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "Course created successfully",
    )))
}

pub async fn update_syllabus(
    service: &SchoolService,
    request: &HttpRequest,
    course_id: i64,
    data: UpdateSyllabusRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    if school.find_course(course_id).is_none() {
        return Err(SchoolHubError::not_found("Course not found").into());
    }
    let storage = service.get_storage(request)?;

    if !storage
        .update_syllabus(course_id, &data.into_syllabus())
        .await?
    {
        return Err(SchoolHubError::not_found("Course not found").into());
    }

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Syllabus updated successfully",
    )))
}

/// 教师创建的班级自动以其为任课教师
pub async fn create_class(
    service: &SchoolService,
    request: &HttpRequest,
    course_id: i64,
    data: CreateNamedRequest,
) -> ActixResult<HttpResponse> {
    data.validate()?;
    let (school, member) = current_school(request)?;
    if school.find_course(course_id).is_none() {
        return Err(SchoolHubError::not_found("Course not found").into());
    }
    let teacher_id = (member.role == SchoolRole::Teacher).then_some(member.user_id);
    let storage = service.get_storage(request)?;

    let class = storage
        .create_class(school.id, course_id, &data.trimmed_name(), teacher_id)
        .await?;
    info!("Class {} created in course {}", class.id, course_id);

    let response = reload_view(&storage, school.id, member.user_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "Class created successfully",
    )))
}
