//! 预导入模块，方便使用

pub use super::class_members::{
    ActiveModel as ClassMemberActiveModel, Entity as ClassMembers, Model as ClassMemberModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::courses::{
    ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel,
};
pub use super::post_classes::{
    ActiveModel as PostClassActiveModel, Entity as PostClasses, Model as PostClassModel,
};
pub use super::posts::{ActiveModel as PostActiveModel, Entity as Posts, Model as PostModel};
pub use super::school_invitations::{
    ActiveModel as SchoolInvitationActiveModel, Entity as SchoolInvitations,
    Model as SchoolInvitationModel,
};
pub use super::school_members::{
    ActiveModel as SchoolMemberActiveModel, Entity as SchoolMembers, Model as SchoolMemberModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::year_groups::{
    ActiveModel as YearGroupActiveModel, Entity as YearGroups, Model as YearGroupModel,
};
