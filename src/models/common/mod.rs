pub mod pagination;
pub mod response;

pub use pagination::{CursorPage, CursorQuery};
pub use response::ApiResponse;
