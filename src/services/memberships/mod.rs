pub mod class_members;
pub mod invitations;
pub mod members;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::schools::requests::{AddClassMemberRequest, InviteMembersRequest};
use crate::storage::Storage;

pub struct MembershipService;

impl MembershipService {
    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::app_data::<dyn Storage>(request, "Storage")
    }

    pub async fn invite_members(
        &self,
        request: &HttpRequest,
        data: InviteMembersRequest,
    ) -> ActixResult<HttpResponse> {
        invitations::invite_members(self, request, data).await
    }

    // 接受邀请，加入学校
    pub async fn accept_invitation(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        invitations::accept_invitation(self, request, school_id).await
    }

    pub async fn decline_invitation(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        invitations::decline_invitation(self, request, school_id).await
    }

    // 移除成员或退出学校
    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        members::remove_member(self, request, user_id).await
    }

    pub async fn request_join_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        class_members::request_join_class(self, request, class_id).await
    }

    pub async fn add_class_member(
        &self,
        request: &HttpRequest,
        class_id: i64,
        data: AddClassMemberRequest,
    ) -> ActixResult<HttpResponse> {
        class_members::add_class_member(self, request, class_id, data).await
    }

    pub async fn remove_class_member(
        &self,
        request: &HttpRequest,
        class_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        class_members::remove_class_member(self, request, class_id, user_id).await
    }
}
