use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SchoolHubError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 50_000;

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 邮箱统一转为小写后存储和比较
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 名称：去除首尾空白后非空，且不超过最大长度
pub fn validate_name(field: &str, value: &str, max_len: usize) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchoolHubError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(SchoolHubError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

pub fn validate_length(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(SchoolHubError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
