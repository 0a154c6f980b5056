//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后组装成 models 中的业务实体。

pub mod prelude;

pub mod class_members;
pub mod classes;
pub mod courses;
pub mod post_classes;
pub mod posts;
pub mod school_invitations;
pub mod school_members;
pub mod schools;
pub mod submissions;
pub mod users;
pub mod year_groups;
