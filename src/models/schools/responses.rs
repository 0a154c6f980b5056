use serde::Serialize;
use ts_rs::TS;

use super::entities::SchoolRole;
use super::view::SchoolView;
use crate::models::users::entities::UserProfile;

// 当前用户所在的学校
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolSummary {
    pub id: i64,
    pub name: String,
    pub role: SchoolRole,
}

// 发给当前用户邮箱的待处理邀请
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct PendingInvitation {
    pub school_id: i64,
    pub school_name: String,
    pub role: SchoolRole,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListResponse {
    pub schools: Vec<SchoolSummary>,
    pub invitations: Vec<PendingInvitation>,
}

// 学校视图及其中出现的用户资料
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolViewResponse {
    pub school: SchoolView,
    pub users: Vec<UserProfile>,
}
