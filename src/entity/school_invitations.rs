//! 学校邀请实体

use sea_orm::entity::prelude::*;

use crate::models::schools::entities::{Invitation, SchoolRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "school_invitations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    /// 小写邮箱
    pub email: String,
    pub role: String,
    pub invited_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id",
        on_delete = "Cascade"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invitation(self) -> Invitation {
        Invitation {
            email: self.email,
            role: self.role.parse().unwrap_or(SchoolRole::Student),
        }
    }
}
