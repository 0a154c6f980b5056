//! 学校存储操作：创建学校、加载学校聚合

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    class_members, classes, courses, school_invitations, school_members, schools, year_groups,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::schools::{
    entities::{Class, ClassMemberStatus, Course, School, SchoolRole, YearGroup},
    responses::{PendingInvitation, SchoolSummary},
};
use crate::utils::now_millis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学校，创建者成为管理员
    pub async fn create_school_impl(&self, name: &str, creator_id: i64) -> Result<School> {
        let now = now_millis();
        let txn = self.db.begin().await?;

        let school = schools::ActiveModel {
            name: Set(name.to_string()),
            created_by: Set(creator_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建学校失败: {e}")))?;

        school_members::ActiveModel {
            school_id: Set(school.id),
            user_id: Set(creator_id),
            role: Set(SchoolRole::Administrator.to_string()),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("添加学校管理员失败: {e}")))?;

        txn.commit().await?;

        self.get_school_impl(school.id)
            .await?
            .ok_or_else(|| SchoolHubError::database_operation("新建的学校不存在"))
    }

    /// 加载学校聚合（结构树、成员、邀请）
    pub async fn get_school_impl(&self, school_id: i64) -> Result<Option<School>> {
        let Some(school) = Schools::find_by_id(school_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校失败: {e}")))?
        else {
            return Ok(None);
        };

        let members = SchoolMembers::find()
            .filter(school_members::Column::SchoolId.eq(school_id))
            .order_by_asc(school_members::Column::JoinedAt)
            .order_by_asc(school_members::Column::Id)
            .all(&self.db)
            .await?;

        let invitations = SchoolInvitations::find()
            .filter(school_invitations::Column::SchoolId.eq(school_id))
            .order_by_asc(school_invitations::Column::CreatedAt)
            .order_by_asc(school_invitations::Column::Id)
            .all(&self.db)
            .await?;

        let year_group_rows = YearGroups::find()
            .filter(year_groups::Column::SchoolId.eq(school_id))
            .order_by_asc(year_groups::Column::Position)
            .order_by_asc(year_groups::Column::Id)
            .all(&self.db)
            .await?;

        let course_rows = Courses::find()
            .filter(courses::Column::SchoolId.eq(school_id))
            .order_by_asc(courses::Column::Position)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await?;

        let class_rows = Classes::find()
            .filter(classes::Column::SchoolId.eq(school_id))
            .order_by_asc(classes::Column::Position)
            .order_by_asc(classes::Column::Id)
            .all(&self.db)
            .await?;

        let class_member_rows = ClassMembers::find()
            .filter(class_members::Column::SchoolId.eq(school_id))
            .order_by_asc(class_members::Column::JoinedAt)
            .order_by_asc(class_members::Column::Id)
            .all(&self.db)
            .await?;

        let build_class = |row: &ClassModel| {
            let mut class = Class {
                id: row.id,
                name: row.name.clone(),
                teacher_ids: Vec::new(),
                student_ids: Vec::new(),
                pending_ids: Vec::new(),
            };
            for member in class_member_rows.iter().filter(|m| m.class_id == row.id) {
                match member.status.parse::<ClassMemberStatus>() {
                    Ok(ClassMemberStatus::Teacher) => class.teacher_ids.push(member.user_id),
                    Ok(ClassMemberStatus::Student) => class.student_ids.push(member.user_id),
                    Ok(ClassMemberStatus::Pending) => class.pending_ids.push(member.user_id),
                    Err(e) => tracing::warn!("忽略无效的班级成员记录 {}: {}", member.id, e),
                }
            }
            class
        };

        let year_groups = year_group_rows
            .iter()
            .map(|yg| YearGroup {
                id: yg.id,
                name: yg.name.clone(),
                courses: course_rows
                    .iter()
                    .filter(|c| c.year_group_id == yg.id)
                    .map(|c| Course {
                        id: c.id,
                        name: c.name.clone(),
                        syllabus: c.syllabus(),
                        classes: class_rows
                            .iter()
                            .filter(|cl| cl.course_id == c.id)
                            .map(build_class)
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Some(School {
            id: school.id,
            name: school.name,
            year_groups,
            members: members.into_iter().map(|m| m.into_member()).collect(),
            invitations: invitations
                .into_iter()
                .map(|i| i.into_invitation())
                .collect(),
            created_at: school.created_at,
        }))
    }

    /// 用户所在的学校及其角色
    pub async fn list_user_schools_impl(&self, user_id: i64) -> Result<Vec<SchoolSummary>> {
        let rows = SchoolMembers::find()
            .filter(school_members::Column::UserId.eq(user_id))
            .order_by_asc(school_members::Column::JoinedAt)
            .find_also_related(Schools)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户学校失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, school)| {
                school.map(|s| SchoolSummary {
                    id: s.id,
                    name: s.name,
                    role: member.role.parse().unwrap_or(SchoolRole::Student),
                })
            })
            .collect())
    }

    /// 发给某邮箱、尚未处理的邀请
    pub async fn list_invitations_for_email_impl(
        &self,
        email: &str,
    ) -> Result<Vec<PendingInvitation>> {
        let rows = SchoolInvitations::find()
            .filter(school_invitations::Column::Email.eq(email))
            .order_by_asc(school_invitations::Column::CreatedAt)
            .find_also_related(Schools)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询邀请失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(invitation, school)| {
                school.map(|s| PendingInvitation {
                    school_id: s.id,
                    school_name: s.name,
                    role: invitation.role.parse().unwrap_or(SchoolRole::Student),
                })
            })
            .collect())
    }
}
