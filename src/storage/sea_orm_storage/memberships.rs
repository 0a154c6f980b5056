//! 成员关系存储操作：学校邀请、学校成员、班级成员

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{class_members, school_invitations, school_members};
use crate::errors::{Result, SchoolHubError};
use crate::models::schools::entities::{ClassMemberStatus, SchoolRole};
use crate::utils::now_millis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 邀请邮箱加入学校；同一邮箱重复邀请时只更新角色
    pub async fn add_invitations_impl(
        &self,
        school_id: i64,
        emails: &[String],
        role: SchoolRole,
        invited_by: i64,
    ) -> Result<()> {
        let now = now_millis();
        let txn = self.db.begin().await?;

        for email in emails {
            let existing = SchoolInvitations::find()
                .filter(
                    Condition::all()
                        .add(school_invitations::Column::SchoolId.eq(school_id))
                        .add(school_invitations::Column::Email.eq(email.as_str())),
                )
                .one(&txn)
                .await?;

            match existing {
                Some(invitation) => {
                    let mut active: school_invitations::ActiveModel = invitation.into();
                    active.role = Set(role.to_string());
                    active.invited_by = Set(invited_by);
                    active.update(&txn).await?;
                }
                None => {
                    school_invitations::ActiveModel {
                        school_id: Set(school_id),
                        email: Set(email.clone()),
                        role: Set(role.to_string()),
                        invited_by: Set(invited_by),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        SchoolHubError::database_operation(format!("创建邀请失败: {e}"))
                    })?;
                }
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// 接受邀请：删除邀请并按邀请角色加入学校
    pub async fn accept_invitation_impl(
        &self,
        school_id: i64,
        user_id: i64,
        email: &str,
    ) -> Result<Option<SchoolRole>> {
        let txn = self.db.begin().await?;

        let Some(invitation) = SchoolInvitations::find()
            .filter(
                Condition::all()
                    .add(school_invitations::Column::SchoolId.eq(school_id))
                    .add(school_invitations::Column::Email.eq(email)),
            )
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let role: SchoolRole = invitation
            .role
            .parse()
            .map_err(SchoolHubError::database_operation)?;

        SchoolInvitations::delete_by_id(invitation.id)
            .exec(&txn)
            .await?;

        school_members::ActiveModel {
            school_id: Set(school_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now_millis()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("加入学校失败: {e}")))?;

        txn.commit().await?;
        Ok(Some(role))
    }

    pub async fn decline_invitation_impl(&self, school_id: i64, email: &str) -> Result<bool> {
        let result = SchoolInvitations::delete_many()
            .filter(
                Condition::all()
                    .add(school_invitations::Column::SchoolId.eq(school_id))
                    .add(school_invitations::Column::Email.eq(email)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("拒绝邀请失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 移除学校成员，同一事务中清理该学校所有班级里的成员记录
    ///
    /// 先删除学校成员行再清理班级记录，与 `set_class_member_impl` 的加锁顺序配合，
    /// 不会留下不属于学校的班级成员。
    pub async fn remove_school_member_impl(&self, school_id: i64, user_id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let result = SchoolMembers::delete_many()
            .filter(
                Condition::all()
                    .add(school_members::Column::SchoolId.eq(school_id))
                    .add(school_members::Column::UserId.eq(user_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("移除学校成员失败: {e}")))?;

        ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(class_members::Column::SchoolId.eq(school_id))
                    .add(class_members::Column::UserId.eq(user_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("移除班级成员失败: {e}")))?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// 设置班级成员状态；已有记录时覆盖状态
    ///
    /// 在同一事务中重新确认用户仍是本校成员且角色与状态相符，否则不写入并返回 `false`。
    pub async fn set_class_member_impl(
        &self,
        school_id: i64,
        class_id: i64,
        user_id: i64,
        status: ClassMemberStatus,
    ) -> Result<bool> {
        let txn = self.db.begin().await?;

        // 第一条语句先写学校成员行：并发的移除操作要么在此之前提交，要么等本事务结束
        let member_filter = Condition::all()
            .add(school_members::Column::SchoolId.eq(school_id))
            .add(school_members::Column::UserId.eq(user_id));
        SchoolMembers::update_many()
            .col_expr(school_members::Column::Role, Expr::cust("role"))
            .filter(member_filter.clone())
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("锁定学校成员失败: {e}")))?;

        let role = SchoolMembers::find()
            .filter(member_filter)
            .one(&txn)
            .await?
            .and_then(|member| member.role.parse::<SchoolRole>().ok());
        if !role.is_some_and(|role| status.allows_role(role)) {
            txn.rollback().await?;
            return Ok(false);
        }

        let existing = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(class_members::Column::ClassId.eq(class_id))
                    .add(class_members::Column::UserId.eq(user_id)),
            )
            .one(&txn)
            .await?;

        match existing {
            Some(member) => {
                let mut active: class_members::ActiveModel = member.into();
                active.status = Set(status.as_str().to_string());
                active.update(&txn).await.map_err(|e| {
                    SchoolHubError::database_operation(format!("更新班级成员失败: {e}"))
                })?;
            }
            None => {
                class_members::ActiveModel {
                    class_id: Set(class_id),
                    school_id: Set(school_id),
                    user_id: Set(user_id),
                    status: Set(status.as_str().to_string()),
                    joined_at: Set(now_millis()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("添加班级成员失败: {e}"))
                })?;
            }
        }

        txn.commit().await?;
        Ok(true)
    }

    pub async fn remove_class_member_impl(&self, class_id: i64, user_id: i64) -> Result<bool> {
        let result = ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(class_members::Column::ClassId.eq(class_id))
                    .add(class_members::Column::UserId.eq(user_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("移除班级成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, user};
    use super::*;

    #[actix_web::test]
    async fn test_invitation_accept_and_decline() {
        let storage = memory_storage().await;
        let ada = user(&storage, "ada").await;
        let bob = user(&storage, "bob").await;
        let school = storage.create_school_impl("Northside", ada.id).await.unwrap();

        let emails = vec![bob.email.clone(), "carol@school.test".to_string()];
        storage
            .add_invitations_impl(school.id, &emails, SchoolRole::Student, ada.id)
            .await
            .unwrap();
        // 重复邀请只更新角色
        storage
            .add_invitations_impl(school.id, &emails[..1], SchoolRole::Teacher, ada.id)
            .await
            .unwrap();

        let pending = storage.list_invitations_for_email_impl(&bob.email).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].role, SchoolRole::Teacher);

        let role = storage
            .accept_invitation_impl(school.id, bob.id, &bob.email)
            .await
            .unwrap();
        assert_eq!(role, Some(SchoolRole::Teacher));
        assert!(
            storage
                .accept_invitation_impl(school.id, bob.id, &bob.email)
                .await
                .unwrap()
                .is_none()
        );

        assert!(storage.decline_invitation_impl(school.id, "carol@school.test").await.unwrap());
        let school = storage.get_school_impl(school.id).await.unwrap().unwrap();
        assert!(school.invitations.is_empty());
        assert_eq!(school.role_of(bob.id), Some(SchoolRole::Teacher));
    }

    #[actix_web::test]
    async fn test_removing_school_member_removes_class_memberships() {
        let storage = memory_storage().await;
        let ada = user(&storage, "ada").await;
        let sam = user(&storage, "sam").await;
        let school = storage.create_school_impl("Northside", ada.id).await.unwrap();
        storage
            .add_invitations_impl(school.id, &[sam.email.clone()], SchoolRole::Student, ada.id)
            .await
            .unwrap();
        storage
            .accept_invitation_impl(school.id, sam.id, &sam.email)
            .await
            .unwrap();

        let yg = storage.create_year_group_impl(school.id, "Year 7").await.unwrap();
        let course = storage.create_course_impl(school.id, yg.id, "Maths").await.unwrap();
        let class_a = storage
            .create_class_impl(school.id, course.id, "7A", Some(ada.id))
            .await
            .unwrap();
        let class_b = storage
            .create_class_impl(school.id, course.id, "7B", None)
            .await
            .unwrap();
        storage
            .set_class_member_impl(school.id, class_a.id, sam.id, ClassMemberStatus::Pending)
            .await
            .unwrap();
        // 批准申请会覆盖原记录
        storage
            .set_class_member_impl(school.id, class_a.id, sam.id, ClassMemberStatus::Student)
            .await
            .unwrap();
        storage
            .set_class_member_impl(school.id, class_b.id, sam.id, ClassMemberStatus::Pending)
            .await
            .unwrap();

        let loaded = storage.get_school_impl(school.id).await.unwrap().unwrap();
        let (_, _, a) = loaded.find_class(class_a.id).unwrap();
        assert_eq!(a.student_ids, vec![sam.id]);
        assert!(a.pending_ids.is_empty());

        assert!(storage.remove_school_member_impl(school.id, sam.id).await.unwrap());
        let loaded = storage.get_school_impl(school.id).await.unwrap().unwrap();
        assert!(loaded.role_of(sam.id).is_none());
        assert!(loaded.classes().all(|c| c.status_of(sam.id).is_none()));
    }

    #[actix_web::test]
    async fn test_class_membership_requires_current_school_membership() {
        let storage = memory_storage().await;
        let ada = user(&storage, "ada").await;
        let sam = user(&storage, "sam").await;
        let school = storage.create_school_impl("Northside", ada.id).await.unwrap();
        storage
            .add_invitations_impl(school.id, &[sam.email.clone()], SchoolRole::Student, ada.id)
            .await
            .unwrap();
        storage
            .accept_invitation_impl(school.id, sam.id, &sam.email)
            .await
            .unwrap();
        let yg = storage.create_year_group_impl(school.id, "Year 7").await.unwrap();
        let course = storage.create_course_impl(school.id, yg.id, "Maths").await.unwrap();
        let class = storage
            .create_class_impl(school.id, course.id, "7A", None)
            .await
            .unwrap();

        // 学生不能作为任课教师写入
        assert!(
            !storage
                .set_class_member_impl(school.id, class.id, sam.id, ClassMemberStatus::Teacher)
                .await
                .unwrap()
        );

        // 快照检查通过后用户被移出学校，写入时重新校验
        let snapshot = storage.get_school_impl(school.id).await.unwrap().unwrap();
        assert_eq!(snapshot.role_of(sam.id), Some(SchoolRole::Student));
        assert!(storage.remove_school_member_impl(school.id, sam.id).await.unwrap());
        assert!(
            !storage
                .set_class_member_impl(school.id, class.id, sam.id, ClassMemberStatus::Student)
                .await
                .unwrap()
        );

        let loaded = storage.get_school_impl(school.id).await.unwrap().unwrap();
        assert!(loaded.classes().all(|c| c.status_of(sam.id).is_none()));
        assert!(
            storage
                .set_class_member_impl(school.id, class.id, ada.id, ClassMemberStatus::Teacher)
                .await
                .unwrap()
        );
    }
}
