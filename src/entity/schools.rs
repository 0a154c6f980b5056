//! 学校实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub created_by: i64,
    /// 最近一次发帖的时间戳，发帖时在事务内递增
    pub last_post_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::school_members::Entity")]
    SchoolMembers,
    #[sea_orm(has_many = "super::school_invitations::Entity")]
    SchoolInvitations,
    #[sea_orm(has_many = "super::year_groups::Entity")]
    YearGroups,
}

impl Related<super::school_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolMembers.def()
    }
}

impl Related<super::school_invitations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolInvitations.def()
    }
}

impl Related<super::year_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
