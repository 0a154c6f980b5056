//! 课程实体

use sea_orm::entity::prelude::*;

use crate::models::schools::entities::Syllabus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub year_group_id: i64,
    pub name: String,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub syllabus_content: String,
    /// JSON 字符串数组
    #[sea_orm(column_type = "Text")]
    pub syllabus_outcomes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::year_groups::Entity",
        from = "Column::YearGroupId",
        to = "super::year_groups::Column::Id",
        on_delete = "Cascade"
    )]
    YearGroup,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::year_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearGroup.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn syllabus(&self) -> Syllabus {
        Syllabus {
            content: self.syllabus_content.clone(),
            outcomes: serde_json::from_str(&self.syllabus_outcomes).unwrap_or_default(),
        }
    }
}
