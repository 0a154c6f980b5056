use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::AuthSubject)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学校表
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(ColumnDef::new(Schools::CreatedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(Schools::LastPostAt)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Schools::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Schools::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学校成员表
        manager
            .create_table(
                Table::create()
                    .table(SchoolMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SchoolMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SchoolMembers::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SchoolMembers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(SchoolMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(SchoolMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SchoolMembers::Table, SchoolMembers::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SchoolMembers::Table, SchoolMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建邀请表
        manager
            .create_table(
                Table::create()
                    .table(SchoolInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SchoolInvitations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SchoolInvitations::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SchoolInvitations::Email).string().not_null())
                    .col(ColumnDef::new(SchoolInvitations::Role).string().not_null())
                    .col(
                        ColumnDef::new(SchoolInvitations::InvitedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SchoolInvitations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SchoolInvitations::Table, SchoolInvitations::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建年级表
        manager
            .create_table(
                Table::create()
                    .table(YearGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(YearGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(YearGroups::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(YearGroups::Name).string().not_null())
                    .col(ColumnDef::new(YearGroups::Position).integer().not_null())
                    .col(ColumnDef::new(YearGroups::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(YearGroups::Table, YearGroups::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::YearGroupId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Position).integer().not_null())
                    .col(ColumnDef::new(Courses::SyllabusContent).text().not_null())
                    .col(ColumnDef::new(Courses::SyllabusOutcomes).text().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::YearGroupId)
                            .to(YearGroups::Table, YearGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Position).integer().not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级成员表（教师 / 学生 / 待审核）
        manager
            .create_table(
                Table::create()
                    .table(ClassMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassMembers::ClassId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ClassMembers::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassMembers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ClassMembers::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassMembers::Table, ClassMembers::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassMembers::Table, ClassMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建帖子表
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posts::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Posts::YearGroupId).big_integer().not_null())
                    .col(ColumnDef::new(Posts::CourseId).big_integer().null())
                    .col(ColumnDef::new(Posts::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Posts::Visibility).string().not_null())
                    .col(ColumnDef::new(Posts::PostType).string().not_null())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::Attachments).text().not_null())
                    .col(ColumnDef::new(Posts::MarkingCriteria).text().null())
                    .col(ColumnDef::new(Posts::ClassScoped).boolean().not_null())
                    .col(ColumnDef::new(Posts::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Posts::Table, Posts::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Posts::Table, Posts::YearGroupId)
                            .to(YearGroups::Table, YearGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建帖子-班级关联表
        manager
            .create_table(
                Table::create()
                    .table(PostClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostClasses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostClasses::PostId).big_integer().not_null())
                    .col(ColumnDef::new(PostClasses::ClassId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PostClasses::Table, PostClasses::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PostClasses::Table, PostClasses::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::PostId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::Attachments).text().not_null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Marks).text().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::MarkedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::MarkedBy).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_school_members_school_user")
                    .table(SchoolMembers::Table)
                    .col(SchoolMembers::SchoolId)
                    .col(SchoolMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_school_members_user_id")
                    .table(SchoolMembers::Table)
                    .col(SchoolMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_school_invitations_school_email")
                    .table(SchoolInvitations::Table)
                    .col(SchoolInvitations::SchoolId)
                    .col(SchoolInvitations::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_school_invitations_email")
                    .table(SchoolInvitations::Table)
                    .col(SchoolInvitations::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_class_members_class_user")
                    .table(ClassMembers::Table)
                    .col(ClassMembers::ClassId)
                    .col(ClassMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_members_school_user")
                    .table(ClassMembers::Table)
                    .col(ClassMembers::SchoolId)
                    .col(ClassMembers::UserId)
                    .to_owned(),
            )
            .await?;

        // 信息流按 (学校, 年级, 时间) 倒序分页
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_feed")
                    .table(Posts::Table)
                    .col(Posts::SchoolId)
                    .col(Posts::YearGroupId)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_classes_class_id")
                    .table(PostClasses::Table)
                    .col(PostClasses::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_submissions_post_student")
                    .table(Submissions::Table)
                    .col(Submissions::PostId)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostClasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(YearGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SchoolInvitations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SchoolMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    AuthSubject,
    DisplayName,
    Email,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
    Name,
    CreatedBy,
    LastPostAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SchoolMembers {
    Table,
    Id,
    SchoolId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum SchoolInvitations {
    Table,
    Id,
    SchoolId,
    Email,
    Role,
    InvitedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum YearGroups {
    Table,
    Id,
    SchoolId,
    Name,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    SchoolId,
    YearGroupId,
    Name,
    Position,
    SyllabusContent,
    SyllabusOutcomes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    Id,
    SchoolId,
    CourseId,
    Name,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassMembers {
    Table,
    Id,
    ClassId,
    SchoolId,
    UserId,
    Status,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    SchoolId,
    YearGroupId,
    CourseId,
    AuthorId,
    Visibility,
    PostType,
    Title,
    Content,
    Attachments,
    MarkingCriteria,
    ClassScoped,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PostClasses {
    Table,
    Id,
    PostId,
    ClassId,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    PostId,
    StudentId,
    Content,
    Attachments,
    SubmittedAt,
    Marks,
    Feedback,
    MarkedAt,
    MarkedBy,
}
