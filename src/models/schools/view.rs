//! 按角色裁剪的学校视图
//!
//! 管理员看到完整结构和邀请；教师看到完整结构，但看不到邀请；
//! 学生只能看到自己所在班级及其上级课程、年级，以及同班同学。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Class, Course, Invitation, School, SchoolRole, YearGroup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolView {
    pub id: i64,
    pub name: String,
    /// 当前用户在该学校中的角色
    pub role: SchoolRole,
    pub year_groups: Vec<YearGroup>,
    pub administrators: Vec<i64>,
    pub teachers: Vec<i64>,
    pub students: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitations: Option<Vec<Invitation>>,
    /// 当前用户尚未获批的入班申请
    pub pending_class_ids: Vec<i64>,
}

impl SchoolView {
    /// 非成员返回 `None`
    pub fn project(school: &School, user_id: i64) -> Option<Self> {
        let role = school.role_of(user_id)?;

        let view = match role {
            SchoolRole::Administrator | SchoolRole::Teacher => SchoolView {
                id: school.id,
                name: school.name.clone(),
                role,
                year_groups: school.year_groups.clone(),
                administrators: school.member_ids(SchoolRole::Administrator),
                teachers: school.member_ids(SchoolRole::Teacher),
                students: school.member_ids(SchoolRole::Student),
                invitations: (role == SchoolRole::Administrator)
                    .then(|| school.invitations.clone()),
                pending_class_ids: Vec::new(),
            },
            SchoolRole::Student => {
                let year_groups = student_year_groups(school, user_id);

                let mut students = vec![user_id];
                for class in year_groups
                    .iter()
                    .flat_map(|yg| &yg.courses)
                    .flat_map(|c| &c.classes)
                {
                    for id in &class.student_ids {
                        if !students.contains(id) {
                            students.push(*id);
                        }
                    }
                }
                // 按学校成员顺序输出
                let students = school
                    .member_ids(SchoolRole::Student)
                    .into_iter()
                    .filter(|id| students.contains(id))
                    .collect();

                SchoolView {
                    id: school.id,
                    name: school.name.clone(),
                    role,
                    year_groups,
                    administrators: school.member_ids(SchoolRole::Administrator),
                    teachers: school.member_ids(SchoolRole::Teacher),
                    students,
                    invitations: None,
                    pending_class_ids: school.pending_class_ids_of(user_id),
                }
            }
        };

        Some(view)
    }

    /// 视图中出现的全部用户 ID，用于加载用户资料
    pub fn visible_user_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .administrators
            .iter()
            .chain(&self.teachers)
            .chain(&self.students)
            .copied()
            .collect();
        for class in self
            .year_groups
            .iter()
            .flat_map(|yg| &yg.courses)
            .flat_map(|c| &c.classes)
        {
            ids.extend(&class.pending_ids);
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn course_ids(&self) -> Vec<i64> {
        self.year_groups
            .iter()
            .flat_map(|yg| &yg.courses)
            .map(|c| c.id)
            .collect()
    }
}

fn student_year_groups(school: &School, user_id: i64) -> Vec<YearGroup> {
    school
        .year_groups
        .iter()
        .filter_map(|yg| {
            let courses: Vec<Course> = yg
                .courses
                .iter()
                .filter_map(|course| {
                    let classes: Vec<Class> = course
                        .classes
                        .iter()
                        .filter(|cl| cl.student_ids.contains(&user_id))
                        .map(|cl| Class {
                            pending_ids: Vec::new(),
                            ..cl.clone()
                        })
                        .collect();
                    (!classes.is_empty()).then(|| Course {
                        classes,
                        ..course.clone()
                    })
                })
                .collect();
            (!courses.is_empty()).then(|| YearGroup {
                id: yg.id,
                name: yg.name.clone(),
                courses,
            })
        })
        .collect()
}
