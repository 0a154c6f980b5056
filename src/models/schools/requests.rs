use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ClassMemberStatus, SchoolRole, Syllabus};
use crate::errors::{Result, SchoolHubError};
use crate::utils::validate::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, normalize_email, validate_email, validate_length,
    validate_name,
};

pub const MAX_INVITATIONS_PER_REQUEST: usize = 100;

// 创建学校、年级、课程、班级共用的请求体
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct CreateNamedRequest {
    pub name: String,
}

impl CreateNamedRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name, MAX_NAME_LEN)
    }

    pub fn trimmed_name(&self) -> String {
        self.name.trim().to_string()
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSyllabusRequest {
    pub content: String,
    #[serde(default)]
    pub outcomes: Vec<String>,
}

impl UpdateSyllabusRequest {
    pub fn validate(&self) -> Result<()> {
        validate_length("content", &self.content, MAX_CONTENT_LEN)?;
        for outcome in &self.outcomes {
            validate_name("outcome", outcome, MAX_CONTENT_LEN)?;
        }
        Ok(())
    }

    pub fn into_syllabus(self) -> Syllabus {
        Syllabus {
            content: self.content,
            outcomes: self
                .outcomes
                .into_iter()
                .map(|o| o.trim().to_string())
                .collect(),
        }
    }
}

// 按邮箱邀请成员加入学校
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct InviteMembersRequest {
    pub emails: Vec<String>,
    pub role: SchoolRole,
}

impl InviteMembersRequest {
    pub fn validate(&self) -> Result<()> {
        if self.emails.is_empty() {
            return Err(SchoolHubError::validation("emails must not be empty"));
        }
        if self.emails.len() > MAX_INVITATIONS_PER_REQUEST {
            return Err(SchoolHubError::validation(format!(
                "At most {MAX_INVITATIONS_PER_REQUEST} emails per request"
            )));
        }
        for email in &self.emails {
            validate_email(email.trim()).map_err(|msg| {
                SchoolHubError::validation(format!("{msg}: {email}"))
            })?;
        }
        Ok(())
    }

    /// 规范化并去重后的邮箱
    pub fn normalized_emails(&self) -> Vec<String> {
        let mut emails: Vec<String> = Vec::with_capacity(self.emails.len());
        for email in self.emails.iter().map(|e| normalize_email(e)) {
            if !emails.contains(&email) {
                emails.push(email);
            }
        }
        emails
    }
}

// 教师/管理员把用户加入班级，或批准学生的入班申请
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct AddClassMemberRequest {
    pub user_id: i64,
    pub status: ClassMemberStatus,
}

impl AddClassMemberRequest {
    pub fn validate(&self) -> Result<()> {
        if self.status == ClassMemberStatus::Pending {
            return Err(SchoolHubError::validation(
                "status must be teacher or student",
            ));
        }
        Ok(())
    }
}
