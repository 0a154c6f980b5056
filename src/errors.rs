//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 错误直接实现 `ResponseError`，服务层可以用 `?` 把错误交给 actix 渲染。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    Authentication("E007", "Authentication Error"),
    Authorization("E008", "Authorization Error"),
    Provider("E009", "Identity Provider Error"),
}

impl SchoolHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolHubError {}

impl ResponseError for SchoolHubError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchoolHubError::Validation(_) => StatusCode::BAD_REQUEST,
            SchoolHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            // 无权限与不存在返回同样的 404，避免泄露资源是否存在
            SchoolHubError::NotFound(_) | SchoolHubError::Authorization(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            SchoolHubError::Validation(msg) => {
                ApiResponse::error_empty(ErrorCode::ValidationFailed, msg.clone())
            }
            SchoolHubError::Authentication(msg) => {
                ApiResponse::error_empty(ErrorCode::Unauthorized, msg.clone())
            }
            SchoolHubError::NotFound(_) | SchoolHubError::Authorization(_) => {
                ApiResponse::error_empty(ErrorCode::NotFound, "Resource not found")
            }
            _ => {
                let correlation_id = uuid::Uuid::new_v4();
                error!(
                    correlation_id = %correlation_id,
                    code = self.code(),
                    "{}",
                    self.format_simple()
                );
                ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Internal server error (ref: {correlation_id})"),
                )
            }
        };
        HttpResponse::build(status).json(body)
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SchoolHubError {
    fn from(err: reqwest::Error) -> Self {
        SchoolHubError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolHubError::database_config("test").code(), "E001");
        assert_eq!(SchoolHubError::validation("test").code(), "E004");
        assert_eq!(SchoolHubError::authentication("test").code(), "E007");
        assert_eq!(SchoolHubError::provider("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolHubError::provider("test").error_type(),
            "Identity Provider Error"
        );
        assert_eq!(
            SchoolHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolHubError::validation("Invalid name");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid name"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SchoolHubError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SchoolHubError::authorization("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchoolHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchoolHubError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_authorization_body_does_not_leak_message() {
        let resp =
            SchoolHubError::authorization("user 7 is not an administrator").error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("administrator"));
        assert!(text.contains("Resource not found"));
    }

    #[actix_web::test]
    async fn test_internal_error_references_correlation_id() {
        let resp = SchoolHubError::database_operation("connection reset").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("ref: "));
        assert!(!text.contains("connection reset"));
    }
}
