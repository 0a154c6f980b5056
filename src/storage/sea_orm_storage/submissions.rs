//! 作业提交存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::submissions;
use crate::errors::{Result, SchoolHubError};
use crate::models::posts::entities::{Attachment, Submission};
use crate::utils::now_millis;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    async fn find_submission(
        &self,
        post_id: i64,
        student_id: i64,
    ) -> Result<Option<SubmissionModel>> {
        Ok(Submissions::find()
            .filter(
                Condition::all()
                    .add(submissions::Column::PostId.eq(post_id))
                    .add(submissions::Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await?)
    }

    /// 重复提交覆盖内容，已有的评分保留
    pub async fn upsert_submission_impl(
        &self,
        post_id: i64,
        student_id: i64,
        content: Option<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Submission> {
        let now = now_millis();
        let attachments = serde_json::to_string(&attachments)?;

        let model = match self.find_submission(post_id, student_id).await? {
            Some(existing) => {
                let mut active: submissions::ActiveModel = existing.into();
                active.content = Set(content);
                active.attachments = Set(attachments);
                active.submitted_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                submissions::ActiveModel {
                    post_id: Set(post_id),
                    student_id: Set(student_id),
                    content: Set(content),
                    attachments: Set(attachments),
                    submitted_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| SchoolHubError::database_operation(format!("保存作业提交失败: {e}")))?;

        Ok(model.into_submission())
    }

    pub async fn list_submissions_impl(&self, post_id: i64) -> Result<Vec<Submission>> {
        let rows = Submissions::find()
            .filter(submissions::Column::PostId.eq(post_id))
            .order_by_asc(submissions::Column::SubmittedAt)
            .order_by_asc(submissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询作业提交失败: {e}")))?;
        Ok(rows.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn get_submission_impl(
        &self,
        post_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        Ok(self
            .find_submission(post_id, student_id)
            .await?
            .map(|m| m.into_submission()))
    }

    /// 没有提交记录时返回 `None`
    pub async fn record_marks_impl(
        &self,
        post_id: i64,
        student_id: i64,
        marks: &[f64],
        feedback: Option<String>,
        marked_by: i64,
    ) -> Result<Option<Submission>> {
        let Some(existing) = self.find_submission(post_id, student_id).await? else {
            return Ok(None);
        };

        let mut active: submissions::ActiveModel = existing.into();
        active.marks = Set(Some(serde_json::to_string(marks)?));
        active.feedback = Set(feedback);
        active.marked_at = Set(Some(now_millis()));
        active.marked_by = Set(Some(marked_by));
        let model = active
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存评分失败: {e}")))?;

        Ok(Some(model.into_submission()))
    }
}
