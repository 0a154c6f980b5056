use serde::Deserialize;
use ts_rs::TS;

use super::entities::{MarkingCriterion, PostType, PostVisibility};
use crate::errors::{Result, SchoolHubError};
use crate::models::CursorQuery;
use crate::utils::validate::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_TITLE_LEN, validate_length, validate_name,
};

pub const MAX_ATTACHMENTS: usize = 20;
pub const MAX_CRITERIA: usize = 50;

// 客户端提交的附件，共享链接由服务端生成
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct AttachmentInput {
    pub name: String,
    pub path: String,
}

fn validate_attachments(attachments: &[AttachmentInput]) -> Result<()> {
    if attachments.len() > MAX_ATTACHMENTS {
        return Err(SchoolHubError::validation(format!(
            "At most {MAX_ATTACHMENTS} attachments are allowed"
        )));
    }
    for attachment in attachments {
        validate_name("attachment name", &attachment.name, MAX_NAME_LEN)?;
        if attachment.path.trim().is_empty() {
            return Err(SchoolHubError::validation("attachment path must not be empty"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct CreatePostRequest {
    pub year_group_id: i64,
    pub course_id: Option<i64>,
    pub class_ids: Option<Vec<i64>>,
    pub visibility: PostVisibility,
    pub post_type: PostType,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
    pub marking_criteria: Option<Vec<MarkingCriterion>>,
}

impl CreatePostRequest {
    /// 与学校结构无关的字段校验
    pub fn validate(&self) -> Result<()> {
        validate_name("title", &self.title, MAX_TITLE_LEN)?;
        validate_length("content", &self.content, MAX_CONTENT_LEN)?;
        validate_attachments(&self.attachments)?;

        if let Some(class_ids) = &self.class_ids {
            if self.course_id.is_none() {
                return Err(SchoolHubError::validation("class_ids require a course_id"));
            }
            if class_ids.is_empty() {
                return Err(SchoolHubError::validation("class_ids must not be empty"));
            }
        }

        match (self.post_type, &self.marking_criteria) {
            (PostType::Assignment, Some(criteria)) => {
                if criteria.is_empty() || criteria.len() > MAX_CRITERIA {
                    return Err(SchoolHubError::validation(format!(
                        "Assignments need between 1 and {MAX_CRITERIA} marking criteria"
                    )));
                }
                for criterion in criteria {
                    validate_name("criterion title", &criterion.title, MAX_TITLE_LEN)?;
                    if !criterion.max_marks.is_finite() || criterion.max_marks <= 0.0 {
                        return Err(SchoolHubError::validation(
                            "max_marks must be a positive number",
                        ));
                    }
                }
            }
            (PostType::Assignment, None) => {
                return Err(SchoolHubError::validation(
                    "Assignments require marking_criteria",
                ));
            }
            (_, Some(_)) => {
                return Err(SchoolHubError::validation(
                    "Only assignments can have marking_criteria",
                ));
            }
            (_, None) => {}
        }
        Ok(())
    }

    /// 去重后的班级列表
    pub fn normalized_class_ids(&self) -> Option<Vec<i64>> {
        self.class_ids.as_ref().map(|ids| {
            let mut out: Vec<i64> = Vec::with_capacity(ids.len());
            for id in ids {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
            out
        })
    }
}

// 信息流查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct FeedQuery {
    pub year_group_id: i64,
    pub course_id: Option<i64>,
    /// 逗号分隔的班级 ID
    pub class_ids: Option<String>,
    pub before: Option<i64>,
    pub limit: Option<i64>,
}

impl FeedQuery {
    pub fn cursor(&self) -> CursorQuery {
        CursorQuery {
            before: self.before,
            limit: self.limit,
        }
    }

    pub fn parsed_class_ids(&self) -> Result<Option<Vec<i64>>> {
        let Some(raw) = self.class_ids.as_deref() else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let mut ids = Vec::new();
        for part in raw.split(',') {
            let id = part.trim().parse::<i64>().map_err(|_| {
                SchoolHubError::validation(format!("Invalid class id: '{}'", part.trim()))
            })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if self.course_id.is_none() {
            return Err(SchoolHubError::validation("class_ids require a course_id"));
        }
        Ok(Some(ids))
    }
}

// 学生提交作业
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

impl SubmitAssignmentRequest {
    pub fn validate(&self) -> Result<()> {
        let has_content = self
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_content && self.attachments.is_empty() {
            return Err(SchoolHubError::validation(
                "A submission needs content or attachments",
            ));
        }
        if let Some(content) = &self.content {
            validate_length("content", content, MAX_CONTENT_LEN)?;
        }
        validate_attachments(&self.attachments)
    }
}

// 教师评分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/post.ts")]
pub struct RecordMarksRequest {
    pub marks: Vec<f64>,
    pub feedback: Option<String>,
}

impl RecordMarksRequest {
    /// 分数个数与评分标准一致，且每项在 0..=max_marks 之间
    pub fn validate_against(&self, criteria: &[MarkingCriterion]) -> Result<()> {
        if self.marks.len() != criteria.len() {
            return Err(SchoolHubError::validation(format!(
                "Expected {} marks, got {}",
                criteria.len(),
                self.marks.len()
            )));
        }
        for (mark, criterion) in self.marks.iter().zip(criteria) {
            if !mark.is_finite() || *mark < 0.0 || *mark > criterion.max_marks {
                return Err(SchoolHubError::validation(format!(
                    "Mark for '{}' must be between 0 and {}",
                    criterion.title, criterion.max_marks
                )));
            }
        }
        if let Some(feedback) = &self.feedback {
            validate_length("feedback", feedback, MAX_CONTENT_LEN)?;
        }
        Ok(())
    }
}
