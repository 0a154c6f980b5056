use crate::errors::Result;
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

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 按提供方账户创建用户，已存在时刷新资料
    async fn upsert_user(&self, account: &ProviderAccount) -> Result<User>;
    // 批量获取用户信息
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;

    /// 学校管理方法
    // 创建学校，创建者成为管理员
    async fn create_school(&self, name: &str, creator_id: i64) -> Result<School>;
    // 加载完整的学校聚合
    async fn get_school(&self, school_id: i64) -> Result<Option<School>>;
    // 列出用户所在的学校
    async fn list_user_schools(&self, user_id: i64) -> Result<Vec<SchoolSummary>>;
    // 列出发给某邮箱的邀请
    async fn list_invitations_for_email(&self, email: &str) -> Result<Vec<PendingInvitation>>;

    /// 学校结构方法
    async fn create_year_group(&self, school_id: i64, name: &str) -> Result<YearGroup>;
    async fn create_course(&self, school_id: i64, year_group_id: i64, name: &str)
    -> Result<Course>;
    async fn update_syllabus(&self, course_id: i64, syllabus: &Syllabus) -> Result<bool>;
    // 创建班级，可同时指定首位任课教师
    async fn create_class(
        &self,
        school_id: i64,
        course_id: i64,
        name: &str,
        teacher_id: Option<i64>,
    ) -> Result<Class>;

    /// 成员管理方法
    // 邀请邮箱加入学校，已有邀请时更新角色
    async fn add_invitations(
        &self,
        school_id: i64,
        emails: &[String],
        role: SchoolRole,
        invited_by: i64,
    ) -> Result<()>;
    // 接受邀请，返回获得的角色；没有邀请时返回 None
    async fn accept_invitation(
        &self,
        school_id: i64,
        user_id: i64,
        email: &str,
    ) -> Result<Option<SchoolRole>>;
    async fn decline_invitation(&self, school_id: i64, email: &str) -> Result<bool>;
    // 移除学校成员，并在同一事务中移除其全部班级成员关系
    async fn remove_school_member(&self, school_id: i64, user_id: i64) -> Result<bool>;
    // 设置班级成员状态，每个用户在一个班级中只有一条记录；
    // 用户已不是本校成员或角色与状态不符时不写入并返回 false
    async fn set_class_member(
        &self,
        school_id: i64,
        class_id: i64,
        user_id: i64,
        status: ClassMemberStatus,
    ) -> Result<bool>;
    async fn remove_class_member(&self, class_id: i64, user_id: i64) -> Result<bool>;

    /// 帖子方法
    async fn create_post(
        &self,
        school_id: i64,
        author_id: i64,
        post: &CreatePostRequest,
        attachments: Vec<Attachment>,
    ) -> Result<Post>;
    async fn get_post(&self, school_id: i64, post_id: i64) -> Result<Option<Post>>;
    // 按游标读取信息流，最多返回 `fetch` 条
    async fn list_feed(&self, scope: &FeedScope, before: i64, fetch: u64) -> Result<Vec<Post>>;
    async fn delete_post(&self, post_id: i64) -> Result<bool>;

    /// 作业提交方法
    async fn upsert_submission(
        &self,
        post_id: i64,
        student_id: i64,
        content: Option<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Submission>;
    async fn list_submissions(&self, post_id: i64) -> Result<Vec<Submission>>;
    async fn get_submission(&self, post_id: i64, student_id: i64) -> Result<Option<Submission>>;
    async fn record_marks(
        &self,
        post_id: i64,
        student_id: i64,
        marks: &[f64],
        feedback: Option<String>,
        marked_by: i64,
    ) -> Result<Option<Submission>>;
}
