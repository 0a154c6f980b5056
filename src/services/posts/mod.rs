pub mod create;
pub mod delete;
pub mod feed;
pub mod get;
pub mod submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::posts::requests::{
    CreatePostRequest, FeedQuery, RecordMarksRequest, SubmitAssignmentRequest,
};
use crate::provider::IdentityProvider;
use crate::storage::Storage;

pub struct PostService;

impl PostService {
    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::app_data::<dyn Storage>(request, "Storage")
    }

    pub(crate) fn get_provider(&self, request: &HttpRequest) -> Result<Arc<dyn IdentityProvider>> {
        super::app_data::<dyn IdentityProvider>(request, "Identity provider")
    }

    pub async fn create_post(
        &self,
        request: &HttpRequest,
        post_data: CreatePostRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_post(self, request, post_data).await
    }

    // 信息流分页
    pub async fn list_feed(
        &self,
        request: &HttpRequest,
        query: FeedQuery,
    ) -> ActixResult<HttpResponse> {
        feed::list_feed(self, request, query).await
    }

    pub async fn get_post(&self, request: &HttpRequest, post_id: i64) -> ActixResult<HttpResponse> {
        get::get_post(self, request, post_id).await
    }

    pub async fn delete_post(
        &self,
        request: &HttpRequest,
        post_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_post(self, request, post_id).await
    }

    // 解析附件的直接下载地址
    pub async fn get_attachment(
        &self,
        request: &HttpRequest,
        post_id: i64,
        index: usize,
    ) -> ActixResult<HttpResponse> {
        get::get_attachment(self, request, post_id, index).await
    }

    pub async fn submit_assignment(
        &self,
        request: &HttpRequest,
        post_id: i64,
        submission: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::submit_assignment(self, request, post_id, submission).await
    }

    pub async fn record_marks(
        &self,
        request: &HttpRequest,
        post_id: i64,
        student_id: i64,
        marks: RecordMarksRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::record_marks(self, request, post_id, student_id, marks).await
    }
}
