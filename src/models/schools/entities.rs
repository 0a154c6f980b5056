use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学校内角色，一个用户在一所学校中只有一个角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub enum SchoolRole {
    Administrator,
    Teacher,
    Student,
}

impl SchoolRole {
    pub const ADMINISTRATOR: &'static str = "administrator";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolRole::Administrator => Self::ADMINISTRATOR,
            SchoolRole::Teacher => Self::TEACHER,
            SchoolRole::Student => Self::STUDENT,
        }
    }

    /// 管理员和教师
    pub fn is_staff(&self) -> bool {
        matches!(self, SchoolRole::Administrator | SchoolRole::Teacher)
    }
}

impl<'de> Deserialize<'de> for SchoolRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid school role '{s}', expected one of: administrator, teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for SchoolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SchoolRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ADMINISTRATOR => Ok(SchoolRole::Administrator),
            Self::TEACHER => Ok(SchoolRole::Teacher),
            Self::STUDENT => Ok(SchoolRole::Student),
            _ => Err(format!("Invalid school role: {s}")),
        }
    }
}

// 班级成员状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub enum ClassMemberStatus {
    Teacher,
    Student,
    /// 学生提交了加入申请，等待教师或管理员批准
    Pending,
}

impl ClassMemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassMemberStatus::Teacher => "teacher",
            ClassMemberStatus::Student => "student",
            ClassMemberStatus::Pending => "pending",
        }
    }

    /// 任课教师来自管理员和教师，学生和申请者必须是学生
    pub fn allows_role(&self, role: SchoolRole) -> bool {
        match self {
            ClassMemberStatus::Teacher => role.is_staff(),
            ClassMemberStatus::Student | ClassMemberStatus::Pending => role == SchoolRole::Student,
        }
    }
}

impl std::str::FromStr for ClassMemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(ClassMemberStatus::Teacher),
            "student" => Ok(ClassMemberStatus::Student),
            "pending" => Ok(ClassMemberStatus::Pending),
            _ => Err(format!("Invalid class member status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolMember {
    pub user_id: i64,
    pub role: SchoolRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct Invitation {
    pub email: String,
    pub role: SchoolRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct Syllabus {
    pub content: String,
    pub outcomes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub teacher_ids: Vec<i64>,
    pub student_ids: Vec<i64>,
    pub pending_ids: Vec<i64>,
}

impl Class {
    pub fn status_of(&self, user_id: i64) -> Option<ClassMemberStatus> {
        if self.teacher_ids.contains(&user_id) {
            Some(ClassMemberStatus::Teacher)
        } else if self.student_ids.contains(&user_id) {
            Some(ClassMemberStatus::Student)
        } else if self.pending_ids.contains(&user_id) {
            Some(ClassMemberStatus::Pending)
        } else {
            None
        }
    }

    /// 以教师或正式学生身份属于该班级（不含待审批）
    pub fn has_member(&self, user_id: i64) -> bool {
        self.teacher_ids.contains(&user_id) || self.student_ids.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub syllabus: Syllabus,
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct YearGroup {
    pub id: i64,
    pub name: String,
    pub courses: Vec<Course>,
}

/// 学校聚合：结构树 + 成员 + 待处理邀请
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub year_groups: Vec<YearGroup>,
    pub members: Vec<SchoolMember>,
    pub invitations: Vec<Invitation>,
    pub created_at: i64,
}

impl School {
    pub fn role_of(&self, user_id: i64) -> Option<SchoolRole> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }

    pub fn member_ids(&self, role: SchoolRole) -> Vec<i64> {
        self.members
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.user_id)
            .collect()
    }

    pub fn find_year_group(&self, year_group_id: i64) -> Option<&YearGroup> {
        self.year_groups.iter().find(|yg| yg.id == year_group_id)
    }

    pub fn find_course(&self, course_id: i64) -> Option<(&YearGroup, &Course)> {
        self.year_groups.iter().find_map(|yg| {
            yg.courses
                .iter()
                .find(|c| c.id == course_id)
                .map(|c| (yg, c))
        })
    }

    pub fn find_class(&self, class_id: i64) -> Option<(&YearGroup, &Course, &Class)> {
        self.year_groups.iter().find_map(|yg| {
            yg.courses.iter().find_map(|c| {
                c.classes
                    .iter()
                    .find(|cl| cl.id == class_id)
                    .map(|cl| (yg, c, cl))
            })
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.year_groups
            .iter()
            .flat_map(|yg| yg.courses.iter())
            .flat_map(|c| c.classes.iter())
    }

    /// 用户以教师或正式学生身份所在的班级
    pub fn class_ids_of(&self, user_id: i64) -> Vec<i64> {
        self.classes()
            .filter(|cl| cl.has_member(user_id))
            .map(|cl| cl.id)
            .collect()
    }

    /// 用户提交了加入申请、尚未批准的班级
    pub fn pending_class_ids_of(&self, user_id: i64) -> Vec<i64> {
        self.classes()
            .filter(|cl| cl.pending_ids.contains(&user_id))
            .map(|cl| cl.id)
            .collect()
    }

    /// 管理员可以管理任意班级，教师只能管理自己任教的班级
    pub fn can_manage_class(&self, user_id: i64, class_id: i64) -> bool {
        match self.role_of(user_id) {
            Some(SchoolRole::Administrator) => self.find_class(class_id).is_some(),
            Some(SchoolRole::Teacher) => self
                .find_class(class_id)
                .is_some_and(|(_, _, cl)| cl.teacher_ids.contains(&user_id)),
            _ => false,
        }
    }

    pub fn administrator_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == SchoolRole::Administrator)
            .count()
    }
}
