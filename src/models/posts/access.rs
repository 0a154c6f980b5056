//! 帖子的发布范围校验与可见性规则
//!
//! `FeedScope::matches` 与存储层的信息流查询条件保持一致，
//! 单个帖子的查看权限也走同一套规则。

use super::entities::{Post, PostType, PostVisibility};
use super::requests::CreatePostRequest;
use crate::errors::{Result, SchoolHubError};
use crate::models::schools::entities::{School, SchoolRole};

/// 学生查看帖子时的额外限制
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRestriction {
    pub user_id: i64,
    pub year_group_ids: Vec<i64>,
    pub course_ids: Vec<i64>,
    pub class_ids: Vec<i64>,
}

impl StudentRestriction {
    pub fn for_student(school: &School, user_id: i64) -> Self {
        let mut year_group_ids = Vec::new();
        let mut course_ids = Vec::new();
        let mut class_ids = Vec::new();
        for yg in &school.year_groups {
            for course in &yg.courses {
                for class in &course.classes {
                    if class.student_ids.contains(&user_id) {
                        class_ids.push(class.id);
                        if !course_ids.contains(&course.id) {
                            course_ids.push(course.id);
                        }
                        if !year_group_ids.contains(&yg.id) {
                            year_group_ids.push(yg.id);
                        }
                    }
                }
            }
        }
        Self {
            user_id,
            year_group_ids,
            course_ids,
            class_ids,
        }
    }

    /// 作者总能看到自己的帖子
    pub fn allows(&self, post: &Post) -> bool {
        if post.author_id == self.user_id {
            return true;
        }
        if post.visibility == PostVisibility::Private {
            return false;
        }
        if !self.year_group_ids.contains(&post.year_group_id) {
            return false;
        }
        if let Some(course_id) = post.course_id
            && !self.course_ids.contains(&course_id)
        {
            return false;
        }
        match &post.class_ids {
            Some(ids) => ids.iter().any(|id| self.class_ids.contains(id)),
            None => true,
        }
    }
}

/// 信息流查询范围
#[derive(Debug, Clone, PartialEq)]
pub struct FeedScope {
    pub school_id: i64,
    pub year_group_id: i64,
    pub course_id: Option<i64>,
    pub class_ids: Option<Vec<i64>>,
    pub student: Option<StudentRestriction>,
}

impl FeedScope {
    /// 根据查看者角色确定查询范围，看不到的年级、课程、班级一律 404
    pub fn resolve(
        school: &School,
        user_id: i64,
        year_group_id: i64,
        course_id: Option<i64>,
        class_ids: Option<Vec<i64>>,
    ) -> Result<Self> {
        let role = school
            .role_of(user_id)
            .ok_or_else(|| SchoolHubError::not_found("Not a member of this school"))?;

        let year_group = school
            .find_year_group(year_group_id)
            .ok_or_else(|| SchoolHubError::not_found("Year group not found"))?;

        if let Some(course_id) = course_id
            && !year_group.courses.iter().any(|c| c.id == course_id)
        {
            return Err(SchoolHubError::not_found("Course not found"));
        }

        if let Some(ids) = &class_ids {
            let course_id = course_id
                .ok_or_else(|| SchoolHubError::validation("class_ids require a course_id"))?;
            for id in ids {
                match school.find_class(*id) {
                    Some((_, course, _)) if course.id == course_id => {}
                    _ => return Err(SchoolHubError::not_found("Class not found")),
                }
            }
        }

        let student = match role {
            SchoolRole::Student => {
                let restriction = StudentRestriction::for_student(school, user_id);
                if !restriction.year_group_ids.contains(&year_group_id) {
                    return Err(SchoolHubError::authorization("Year group not visible"));
                }
                if let Some(course_id) = course_id
                    && !restriction.course_ids.contains(&course_id)
                {
                    return Err(SchoolHubError::authorization("Course not visible"));
                }
                if let Some(ids) = &class_ids
                    && ids.iter().any(|id| !restriction.class_ids.contains(id))
                {
                    return Err(SchoolHubError::authorization("Class not visible"));
                }
                Some(restriction)
            }
            _ => None,
        };

        Ok(Self {
            school_id: school.id,
            year_group_id,
            course_id,
            class_ids,
            student,
        })
    }

    pub fn matches(&self, post: &Post) -> bool {
        if post.school_id != self.school_id || post.year_group_id != self.year_group_id {
            return false;
        }
        if let Some(course_id) = self.course_id
            && post.course_id != Some(course_id)
        {
            return false;
        }
        if let Some(ids) = &self.class_ids
            && let Some(post_ids) = &post.class_ids
            && !post_ids.iter().any(|id| ids.contains(id))
        {
            return false;
        }
        self.student.as_ref().is_none_or(|s| s.allows(post))
    }
}

/// 查看单个帖子的权限
pub fn can_view_post(school: &School, user_id: i64, post: &Post) -> bool {
    if post.school_id != school.id {
        return false;
    }
    match school.role_of(user_id) {
        Some(SchoolRole::Administrator) | Some(SchoolRole::Teacher) => true,
        Some(SchoolRole::Student) => StudentRestriction::for_student(school, user_id).allows(post),
        None => false,
    }
}

/// 管理员可删除任意帖子，其他人只能删除自己的
pub fn can_delete_post(school: &School, user_id: i64, post: &Post) -> bool {
    if post.school_id != school.id {
        return false;
    }
    match school.role_of(user_id) {
        Some(SchoolRole::Administrator) => true,
        Some(_) => post.author_id == user_id,
        None => false,
    }
}

/// 校验发帖目标：年级、课程、班级必须属于同一条路径；
/// 学生只能向自己所在班级发布普通帖子
pub fn authorize_new_post(school: &School, user_id: i64, req: &CreatePostRequest) -> Result<()> {
    let role = school
        .role_of(user_id)
        .ok_or_else(|| SchoolHubError::not_found("Not a member of this school"))?;

    let year_group = school
        .find_year_group(req.year_group_id)
        .ok_or_else(|| SchoolHubError::not_found("Year group not found"))?;

    let course = match req.course_id {
        Some(course_id) => Some(
            year_group
                .courses
                .iter()
                .find(|c| c.id == course_id)
                .ok_or_else(|| SchoolHubError::not_found("Course not found"))?,
        ),
        None => None,
    };

    if let Some(class_ids) = &req.class_ids {
        let course =
            course.ok_or_else(|| SchoolHubError::validation("class_ids require a course_id"))?;
        for id in class_ids {
            if !course.classes.iter().any(|cl| cl.id == *id) {
                return Err(SchoolHubError::validation(format!(
                    "Class {id} does not belong to course {}",
                    course.id
                )));
            }
        }
    }

    if role == SchoolRole::Student {
        if req.post_type != PostType::Post {
            return Err(SchoolHubError::authorization(
                "Students can only create posts of type post",
            ));
        }
        let class_ids = match &req.class_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                return Err(SchoolHubError::validation(
                    "Students must post to at least one of their classes",
                ));
            }
        };
        let own = school.class_ids_of(user_id);
        if class_ids.iter().any(|id| !own.contains(id)) {
            return Err(SchoolHubError::authorization(
                "Students can only post to their own classes",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posts::entities::PostVisibility;
    use crate::models::schools::entities::fixtures::*;

    fn post(id: i64, author: i64, course: Option<i64>, classes: Option<Vec<i64>>) -> Post {
        Post {
            id,
            school_id: 100,
            year_group_id: 1,
            course_id: course,
            class_ids: classes,
            author_id: author,
            visibility: PostVisibility::Public,
            post_type: PostType::Post,
            title: format!("post {id}"),
            content: String::new(),
            attachments: vec![],
            marking_criteria: None,
            created_at: id,
        }
    }

    fn request(class_ids: Option<Vec<i64>>, post_type: PostType) -> CreatePostRequest {
        CreatePostRequest {
            year_group_id: 1,
            course_id: Some(11),
            class_ids,
            visibility: PostVisibility::Public,
            post_type,
            title: "t".into(),
            content: String::new(),
            attachments: vec![],
            marking_criteria: None,
        }
    }

    #[test]
    fn test_student_never_sees_others_private_posts() {
        let school = school();
        let mut private = post(1, TEACHER, Some(11), Some(vec![111]));
        private.visibility = PostVisibility::Private;
        assert!(!can_view_post(&school, ALICE, &private));
        assert!(can_view_post(&school, TEACHER, &private));
        assert!(can_view_post(&school, ADMIN, &private));

        let mut own = post(2, ALICE, Some(11), Some(vec![111]));
        own.visibility = PostVisibility::Private;
        assert!(can_view_post(&school, ALICE, &own));
    }

    #[test]
    fn test_student_sees_only_own_class_posts() {
        let school = school();
        assert!(can_view_post(&school, ALICE, &post(1, TEACHER, Some(11), Some(vec![111]))));
        assert!(!can_view_post(&school, ALICE, &post(2, OTHER_TEACHER, Some(11), Some(vec![112]))));
        // 课程级和年级级帖子
        assert!(can_view_post(&school, ALICE, &post(3, TEACHER, Some(11), None)));
        assert!(can_view_post(&school, ALICE, &post(4, ADMIN, None, None)));
        // 待审批学生看不到
        assert!(!can_view_post(&school, BOB, &post(5, TEACHER, Some(11), None)));
    }

    #[test]
    fn test_feed_scope_for_student_hides_invisible_targets() {
        let school = school();
        assert!(FeedScope::resolve(&school, ALICE, 1, None, None).is_ok());
        // Year 8 对 Alice 不可见
        assert!(FeedScope::resolve(&school, ALICE, 2, None, None).is_err());
        assert!(FeedScope::resolve(&school, ALICE, 1, Some(11), Some(vec![112])).is_err());
        assert!(FeedScope::resolve(&school, 999, 1, None, None).is_err());
        assert!(FeedScope::resolve(&school, TEACHER, 1, Some(21), None).is_err());
    }

    #[test]
    fn test_feed_scope_class_narrowing_includes_course_wide_posts() {
        let school = school();
        let scope = FeedScope::resolve(&school, TEACHER, 1, Some(11), Some(vec![111])).unwrap();
        assert!(scope.matches(&post(1, TEACHER, Some(11), Some(vec![111, 112]))));
        assert!(scope.matches(&post(2, TEACHER, Some(11), None)));
        assert!(!scope.matches(&post(3, TEACHER, Some(11), Some(vec![112]))));
        assert!(!scope.matches(&post(4, TEACHER, None, None)));
    }

    #[test]
    fn test_student_post_restrictions() {
        let school = school();
        assert!(authorize_new_post(&school, ALICE, &request(Some(vec![111]), PostType::Post)).is_ok());
        // 非本人班级
        let err = authorize_new_post(&school, ALICE, &request(Some(vec![112]), PostType::Post))
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Authorization(_)));
        // 必须指定班级
        assert!(authorize_new_post(&school, ALICE, &request(None, PostType::Post)).is_err());
        // 只能发布普通帖子
        assert!(
            authorize_new_post(&school, ALICE, &request(Some(vec![111]), PostType::Material))
                .is_err()
        );
        // 待审批不算班级成员
        assert!(authorize_new_post(&school, BOB, &request(Some(vec![111]), PostType::Post)).is_err());
    }

    #[test]
    fn test_staff_post_targets_must_be_consistent() {
        let school = school();
        assert!(authorize_new_post(&school, TEACHER, &request(Some(vec![112]), PostType::Assignment)).is_ok());
        assert!(authorize_new_post(&school, TEACHER, &request(None, PostType::Material)).is_ok());
        // 班级不属于该课程
        let err = authorize_new_post(&school, ADMIN, &request(Some(vec![211]), PostType::Post))
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Validation(_)));
        let mut wrong_year = request(None, PostType::Post);
        wrong_year.year_group_id = 2;
        assert!(authorize_new_post(&school, ADMIN, &wrong_year).is_err());
    }

    #[test]
    fn test_delete_permissions() {
        let school = school();
        let p = post(1, ALICE, Some(11), Some(vec![111]));
        assert!(can_delete_post(&school, ALICE, &p));
        assert!(can_delete_post(&school, ADMIN, &p));
        assert!(!can_delete_post(&school, TEACHER, &p));
        assert!(!can_delete_post(&school, CAROL, &p));
    }
}
