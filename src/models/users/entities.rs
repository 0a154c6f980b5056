use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户，首次登录时根据身份提供方账户创建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    /// 身份提供方账户 ID
    pub auth_subject: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn profile(&self, include_email: bool) -> UserProfile {
        UserProfile {
            id: self.id,
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
            email: include_email.then(|| self.email.clone()),
        }
    }
}

// 学校视图中展示的用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserProfile {
    pub id: i64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// 仅管理员可见
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_hides_email_unless_requested() {
        let user = User {
            id: 3,
            auth_subject: "dbid:3".into(),
            display_name: "Ada".into(),
            email: "ada@school.test".into(),
            avatar_url: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(user.profile(false).email, None);
        assert_eq!(user.profile(true).email.as_deref(), Some("ada@school.test"));
    }
}
