//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod memberships;
mod posts;
mod schools;
mod structure;
mod submissions;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存数据库只能使用单个连接，否则每个连接各自是一份空库
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            config.pool_size.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    posts::{
        access::FeedScope,
        entities::{Attachment, Post, Submission},
        requests::CreatePostRequest,
    },
    schools::{
        entities::{Class, ClassMemberStatus, Course, School, SchoolRole, Syllabus, YearGroup},
        responses::{PendingInvitation, SchoolSummary},
    },
    users::entities::User,
};
use crate::provider::ProviderAccount;
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn upsert_user(&self, account: &ProviderAccount) -> Result<User> {
        self.upsert_user_impl(account).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    // 学校模块
    async fn create_school(&self, name: &str, creator_id: i64) -> Result<School> {
        self.create_school_impl(name, creator_id).await
    }

    async fn get_school(&self, school_id: i64) -> Result<Option<School>> {
        self.get_school_impl(school_id).await
    }

    async fn list_user_schools(&self, user_id: i64) -> Result<Vec<SchoolSummary>> {
        self.list_user_schools_impl(user_id).await
    }

    async fn list_invitations_for_email(&self, email: &str) -> Result<Vec<PendingInvitation>> {
        self.list_invitations_for_email_impl(email).await
    }

    // 结构模块
    async fn create_year_group(&self, school_id: i64, name: &str) -> Result<YearGroup> {
        self.create_year_group_impl(school_id, name).await
    }

    async fn create_course(
        &self,
        school_id: i64,
        year_group_id: i64,
        name: &str,
    ) -> Result<Course> {
        self.create_course_impl(school_id, year_group_id, name)
            .await
    }

    async fn update_syllabus(&self, course_id: i64, syllabus: &Syllabus) -> Result<bool> {
        self.update_syllabus_impl(course_id, syllabus).await
    }

    async fn create_class(
        &self,
        school_id: i64,
        course_id: i64,
        name: &str,
        teacher_id: Option<i64>,
    ) -> Result<Class> {
        self.create_class_impl(school_id, course_id, name, teacher_id)
            .await
    }

    // 成员模块
    async fn add_invitations(
        &self,
        school_id: i64,
        emails: &[String],
        role: SchoolRole,
        invited_by: i64,
    ) -> Result<()> {
        self.add_invitations_impl(school_id, emails, role, invited_by)
            .await
    }

    async fn accept_invitation(
        &self,
        school_id: i64,
        user_id: i64,
        email: &str,
    ) -> Result<Option<SchoolRole>> {
        self.accept_invitation_impl(school_id, user_id, email).await
    }

    async fn decline_invitation(&self, school_id: i64, email: &str) -> Result<bool> {
        self.decline_invitation_impl(school_id, email).await
    }

    async fn remove_school_member(&self, school_id: i64, user_id: i64) -> Result<bool> {
        self.remove_school_member_impl(school_id, user_id).await
    }

    async fn set_class_member(
        &self,
        school_id: i64,
        class_id: i64,
        user_id: i64,
        status: ClassMemberStatus,
    ) -> Result<bool> {
        self.set_class_member_impl(school_id, class_id, user_id, status)
            .await
    }

    async fn remove_class_member(&self, class_id: i64, user_id: i64) -> Result<bool> {
        self.remove_class_member_impl(class_id, user_id).await
    }

    // 帖子模块
    async fn create_post(
        &self,
        school_id: i64,
        author_id: i64,
        post: &CreatePostRequest,
        attachments: Vec<Attachment>,
    ) -> Result<Post> {
        self.create_post_impl(school_id, author_id, post, attachments)
            .await
    }

    async fn get_post(&self, school_id: i64, post_id: i64) -> Result<Option<Post>> {
        self.get_post_impl(school_id, post_id).await
    }

    async fn list_feed(&self, scope: &FeedScope, before: i64, fetch: u64) -> Result<Vec<Post>> {
        self.list_feed_impl(scope, before, fetch).await
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        self.delete_post_impl(post_id).await
    }

    // 作业提交模块
    async fn upsert_submission(
        &self,
        post_id: i64,
        student_id: i64,
        content: Option<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Submission> {
        self.upsert_submission_impl(post_id, student_id, content, attachments)
            .await
    }

    async fn list_submissions(&self, post_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_impl(post_id).await
    }

    async fn get_submission(&self, post_id: i64, student_id: i64) -> Result<Option<Submission>> {
        self.get_submission_impl(post_id, student_id).await
    }

    async fn record_marks(
        &self,
        post_id: i64,
        student_id: i64,
        marks: &[f64],
        feedback: Option<String>,
        marked_by: i64,
    ) -> Result<Option<Submission>> {
        self.record_marks_impl(post_id, student_id, marks, feedback, marked_by)
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// 单连接内存数据库
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .expect("in-memory storage")
    }

    /// 多连接的临时 SQLite 文件数据库，用于并发场景
    pub async fn file_storage(pool_size: u32) -> (SeaOrmStorage, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("schoolhub-{}.db", uuid::Uuid::new_v4()));
        let storage = SeaOrmStorage::connect(&DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            pool_size,
            timeout: 10,
        })
        .await
        .expect("file storage");
        (storage, path)
    }

    pub fn remove_db_files(path: &std::path::Path) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    pub async fn user(storage: &SeaOrmStorage, subject: &str) -> User {
        storage
            .upsert_user_impl(&ProviderAccount {
                subject: subject.to_string(),
                display_name: subject.to_uppercase(),
                email: format!("{subject}@school.test"),
                avatar_url: None,
            })
            .await
            .expect("user")
    }
}
