pub mod create;
pub mod get;
pub mod list;
pub mod structure;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::schools::requests::{CreateNamedRequest, UpdateSyllabusRequest};
use crate::storage::Storage;

pub use get::{reload_view, school_view_response};

pub struct SchoolService;

impl SchoolService {
    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::app_data::<dyn Storage>(request, "Storage")
    }

    // 当前用户的学校和待处理邀请
    pub async fn list_schools(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_schools(self, request).await
    }

    pub async fn create_school(
        &self,
        request: &HttpRequest,
        school_data: CreateNamedRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, request, school_data).await
    }

    // 按角色裁剪后的学校视图
    pub async fn get_school(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_school(self, request).await
    }

    pub async fn create_year_group(
        &self,
        request: &HttpRequest,
        data: CreateNamedRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_year_group(self, request, data).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        year_group_id: i64,
        data: CreateNamedRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_course(self, request, year_group_id, data).await
    }

    pub async fn update_syllabus(
        &self,
        request: &HttpRequest,
        course_id: i64,
        data: UpdateSyllabusRequest,
    ) -> ActixResult<HttpResponse> {
        structure::update_syllabus(self, request, course_id, data).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        course_id: i64,
        data: CreateNamedRequest,
    ) -> ActixResult<HttpResponse> {
        structure::create_class(self, request, course_id, data).await
    }
}
