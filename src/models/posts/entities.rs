use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub enum PostVisibility {
    Public,
    /// 只有作者和教职人员可见
    Private,
}

impl PostVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostVisibility::Public => "public",
            PostVisibility::Private => "private",
        }
    }
}

impl std::str::FromStr for PostVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(PostVisibility::Public),
            "private" => Ok(PostVisibility::Private),
            _ => Err(format!("Invalid post visibility: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub enum PostType {
    Post,
    Material,
    Assignment,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Post => "post",
            PostType::Material => "material",
            PostType::Assignment => "assignment",
        }
    }
}

impl std::str::FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(PostType::Post),
            "material" => Ok(PostType::Material),
            "assignment" => Ok(PostType::Assignment),
            _ => Err(format!("Invalid post type: {s}")),
        }
    }
}

// 附件：作者网盘中的文件路径，以及创建时生成的共享链接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct Attachment {
    pub name: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct MarkingCriterion {
    pub title: String,
    pub max_marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct Post {
    pub id: i64,
    pub school_id: i64,
    pub year_group_id: i64,
    pub course_id: Option<i64>,
    /// 为空表示面向整个课程（或整个年级）
    pub class_ids: Option<Vec<i64>>,
    pub author_id: i64,
    pub visibility: PostVisibility,
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub marking_criteria: Option<Vec<MarkingCriterion>>,
    pub created_at: i64,
}

// 学生提交的作业，`marks[i]` 对应第 i 条评分标准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct Submission {
    pub student_id: i64,
    pub content: Option<String>,
    pub attachments: Vec<Attachment>,
    pub submitted_at: i64,
    pub marks: Option<Vec<f64>>,
    pub feedback: Option<String>,
    pub marked_at: Option<i64>,
    pub marked_by: Option<i64>,
}
