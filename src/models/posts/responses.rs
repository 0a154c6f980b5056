use serde::Serialize;
use ts_rs::TS;

use super::entities::{Post, Submission};

// 帖子详情；学生只能看到自己的提交
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct PostDetailResponse {
    pub post: Post,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct AttachmentLinkResponse {
    pub name: String,
    pub url: String,
}
