//! 作业提交实体

use sea_orm::entity::prelude::*;

use crate::models::posts::entities::Submission;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub post_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    pub submitted_at: i64,
    /// JSON 数字数组
    #[sea_orm(column_type = "Text", nullable)]
    pub marks: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub marked_at: Option<i64>,
    pub marked_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::posts::Entity",
        from = "Column::PostId",
        to = "super::posts::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> Submission {
        Submission {
            student_id: self.student_id,
            content: self.content,
            attachments: serde_json::from_str(&self.attachments).unwrap_or_default(),
            submitted_at: self.submitted_at,
            marks: self.marks.as_deref().and_then(|s| serde_json::from_str(s).ok()),
            feedback: self.feedback,
            marked_at: self.marked_at,
            marked_by: self.marked_by,
        }
    }
}
