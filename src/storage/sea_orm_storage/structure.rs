//! 学校结构存储操作：年级、课程、班级

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{class_members, classes, courses, year_groups};
use crate::errors::{Result, SchoolHubError};
use crate::models::schools::entities::{Class, ClassMemberStatus, Course, Syllabus, YearGroup};
use crate::utils::now_millis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_year_group_impl(&self, school_id: i64, name: &str) -> Result<YearGroup> {
        let position = YearGroups::find()
            .filter(year_groups::Column::SchoolId.eq(school_id))
            .count(&self.db)
            .await?;

        let model = year_groups::ActiveModel {
            school_id: Set(school_id),
            name: Set(name.to_string()),
            position: Set(position as i32),
            created_at: Set(now_millis()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建年级失败: {e}")))?;

        Ok(YearGroup {
            id: model.id,
            name: model.name,
            courses: Vec::new(),
        })
    }

    pub async fn create_course_impl(
        &self,
        school_id: i64,
        year_group_id: i64,
        name: &str,
    ) -> Result<Course> {
        let now = now_millis();
        let position = Courses::find()
            .filter(courses::Column::YearGroupId.eq(year_group_id))
            .count(&self.db)
            .await?;

        let syllabus = Syllabus::default();
        let model = courses::ActiveModel {
            school_id: Set(school_id),
            year_group_id: Set(year_group_id),
            name: Set(name.to_string()),
            position: Set(position as i32),
            syllabus_content: Set(syllabus.content),
            syllabus_outcomes: Set(serde_json::to_string(&syllabus.outcomes)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(Course {
            id: model.id,
            name: model.name.clone(),
            syllabus: model.syllabus(),
            classes: Vec::new(),
        })
    }

    pub async fn update_syllabus_impl(&self, course_id: i64, syllabus: &Syllabus) -> Result<bool> {
        let Some(course) = Courses::find_by_id(course_id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut active: courses::ActiveModel = course.into();
        active.syllabus_content = Set(syllabus.content.clone());
        active.syllabus_outcomes = Set(serde_json::to_string(&syllabus.outcomes)?);
        active.updated_at = Set(now_millis());
        active
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新教学大纲失败: {e}")))?;

        Ok(true)
    }

    /// 创建班级；教师创建时自己成为任课教师
    pub async fn create_class_impl(
        &self,
        school_id: i64,
        course_id: i64,
        name: &str,
        teacher_id: Option<i64>,
    ) -> Result<Class> {
        let now = now_millis();
        let txn = self.db.begin().await?;

        let position = Classes::find()
            .filter(classes::Column::CourseId.eq(course_id))
            .count(&txn)
            .await?;

        let class = classes::ActiveModel {
            school_id: Set(school_id),
            course_id: Set(course_id),
            name: Set(name.to_string()),
            position: Set(position as i32),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建班级失败: {e}")))?;

        if let Some(teacher_id) = teacher_id {
            class_members::ActiveModel {
                class_id: Set(class.id),
                school_id: Set(school_id),
                user_id: Set(teacher_id),
                status: Set(ClassMemberStatus::Teacher.as_str().to_string()),
                joined_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("添加任课教师失败: {e}")))?;
        }

        txn.commit().await?;

        Ok(Class {
            id: class.id,
            name: class.name,
            teacher_ids: teacher_id.into_iter().collect(),
            student_ids: Vec::new(),
            pending_ids: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, user};
    use super::*;

    #[actix_web::test]
    async fn test_structure_keeps_insertion_order() {
        let storage = memory_storage().await;
        let ada = user(&storage, "ada").await;
        let school = storage.create_school_impl("Northside", ada.id).await.unwrap();

        let y7 = storage.create_year_group_impl(school.id, "Year 7").await.unwrap();
        let y8 = storage.create_year_group_impl(school.id, "Year 8").await.unwrap();
        let maths = storage
            .create_course_impl(school.id, y7.id, "Maths")
            .await
            .unwrap();
        storage
            .create_class_impl(school.id, maths.id, "7A", Some(ada.id))
            .await
            .unwrap();
        storage
            .create_class_impl(school.id, maths.id, "7B", None)
            .await
            .unwrap();
        let syllabus = Syllabus {
            content: "Algebra".into(),
            outcomes: vec!["Solve linear equations".into()],
        };
        assert!(storage.update_syllabus_impl(maths.id, &syllabus).await.unwrap());
        assert!(!storage.update_syllabus_impl(9999, &syllabus).await.unwrap());

        let school = storage.get_school_impl(school.id).await.unwrap().unwrap();
        let ids: Vec<i64> = school.year_groups.iter().map(|yg| yg.id).collect();
        assert_eq!(ids, vec![y7.id, y8.id]);
        let course = &school.year_groups[0].courses[0];
        assert_eq!(course.syllabus, syllabus);
        let names: Vec<&str> = course.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["7A", "7B"]);
        assert_eq!(course.classes[0].teacher_ids, vec![ada.id]);
    }
}
