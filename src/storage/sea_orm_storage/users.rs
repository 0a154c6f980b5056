//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::users::entities::User;
use crate::provider::ProviderAccount;
use crate::utils::{now_millis, validate::normalize_email};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 首次登录时创建用户，之后每次登录刷新资料
    pub async fn upsert_user_impl(&self, account: &ProviderAccount) -> Result<User> {
        let now = now_millis();
        let email = normalize_email(&account.email);

        let existing = Users::find()
            .filter(Column::AuthSubject.eq(account.subject.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        let model = match existing {
            Some(user) => {
                if user.display_name == account.display_name
                    && user.email == email
                    && user.avatar_url == account.avatar_url
                {
                    return Ok(user.into_user());
                }
                let mut active: ActiveModel = user.into();
                active.display_name = Set(account.display_name.clone());
                active.email = Set(email);
                active.avatar_url = Set(account.avatar_url.clone());
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| SchoolHubError::database_operation(format!("更新用户失败: {e}")))?
            }
            None => ActiveModel {
                auth_subject: Set(account.subject.clone()),
                display_name: Set(account.display_name.clone()),
                email: Set(email),
                avatar_url: Set(account.avatar_url.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建用户失败: {e}")))?,
        };

        Ok(model.into_user())
    }

    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::*;

    fn account(name: &str) -> ProviderAccount {
        ProviderAccount {
            subject: "dbid:42".into(),
            display_name: name.into(),
            email: "Ada@School.test".into(),
            avatar_url: None,
        }
    }

    #[actix_web::test]
    async fn test_upsert_creates_then_refreshes_profile() {
        let storage = memory_storage().await;
        let first = storage.upsert_user_impl(&account("Ada")).await.unwrap();
        assert_eq!(first.email, "ada@school.test");

        let second = storage.upsert_user_impl(&account("Ada L.")).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.display_name, "Ada L.");

        let loaded = storage.get_users_by_ids_impl(&[first.id, 999]).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(storage.get_users_by_ids_impl(&[]).await.unwrap().is_empty());
    }
}
