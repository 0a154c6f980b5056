//! 帖子实体

use sea_orm::entity::prelude::*;

use crate::models::posts::entities::{Post, PostType, PostVisibility};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub year_group_id: i64,
    pub course_id: Option<i64>,
    pub author_id: i64,
    /// public / private
    pub visibility: String,
    /// post / material / assignment
    pub post_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// JSON 附件数组
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub marking_criteria: Option<String>,
    /// 是否指定了目标班级（目标班级在 post_classes 表中）
    pub class_scoped: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_classes::Entity")]
    PostClasses,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::post_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostClasses.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `class_ids` 由调用方从 post_classes 中加载
    pub fn into_post(self, class_ids: Option<Vec<i64>>) -> Post {
        Post {
            id: self.id,
            school_id: self.school_id,
            year_group_id: self.year_group_id,
            course_id: self.course_id,
            class_ids: if self.class_scoped { class_ids } else { None },
            author_id: self.author_id,
            visibility: self.visibility.parse().unwrap_or(PostVisibility::Private),
            post_type: self.post_type.parse().unwrap_or(PostType::Post),
            title: self.title,
            content: self.content,
            attachments: serde_json::from_str(&self.attachments).unwrap_or_default(),
            marking_criteria: self
                .marking_criteria
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            created_at: self.created_at,
        }
    }
}
