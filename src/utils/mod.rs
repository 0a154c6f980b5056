pub mod jwt;
pub mod parameter_error_handler;
pub mod validate;

pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};

/// 当前 Unix 毫秒时间戳
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
