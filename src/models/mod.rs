pub mod auth;
pub mod common;
pub mod posts;
pub mod schools;
pub mod users;

pub use common::*;

use serde::{Deserialize, Serialize};

// 业务错误码，与 HTTP 状态码一起返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    NotFound = 1004,
    InternalServerError = 1005,

    // 认证相关
    AuthFailed = 2000,
    StateInvalid = 2001,
}

// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
