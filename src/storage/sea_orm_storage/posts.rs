//! 帖子存储操作与信息流查询

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{post_classes, posts, schools, submissions};
use crate::errors::{Result, SchoolHubError};
use crate::models::posts::{
    access::FeedScope,
    entities::{Attachment, Post, PostVisibility},
    requests::CreatePostRequest,
};
use crate::utils::now_millis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
    sea_query::{Expr, SelectStatement},
};

/// 指向任一给定班级的帖子 ID 子查询
fn post_ids_targeting(class_ids: &[i64]) -> SelectStatement {
    PostClasses::find()
        .select_only()
        .column(post_classes::Column::PostId)
        .filter(post_classes::Column::ClassId.is_in(class_ids.iter().copied()))
        .into_query()
}

/// 信息流过滤条件，与 `FeedScope::matches` 一致
fn feed_condition(scope: &FeedScope, before: i64) -> Condition {
    let mut cond = Condition::all()
        .add(posts::Column::SchoolId.eq(scope.school_id))
        .add(posts::Column::YearGroupId.eq(scope.year_group_id))
        .add(posts::Column::CreatedAt.lt(before));

    if let Some(course_id) = scope.course_id {
        cond = cond.add(posts::Column::CourseId.eq(course_id));
    }

    // 指定班级时，包含面向这些班级的帖子和课程级帖子
    if let Some(class_ids) = &scope.class_ids {
        cond = cond.add(
            Condition::any()
                .add(posts::Column::ClassScoped.eq(false))
                .add(posts::Column::Id.in_subquery(post_ids_targeting(class_ids))),
        );
    }

    if let Some(student) = &scope.student {
        let mut course_rule = Condition::any().add(posts::Column::CourseId.is_null());
        if !student.course_ids.is_empty() {
            course_rule =
                course_rule.add(posts::Column::CourseId.is_in(student.course_ids.iter().copied()));
        }

        let mut class_rule = Condition::any().add(posts::Column::ClassScoped.eq(false));
        if !student.class_ids.is_empty() {
            class_rule = class_rule
                .add(posts::Column::Id.in_subquery(post_ids_targeting(&student.class_ids)));
        }

        cond = cond.add(
            Condition::any()
                .add(posts::Column::AuthorId.eq(student.user_id))
                .add(
                    Condition::all()
                        .add(posts::Column::Visibility.eq(PostVisibility::Public.as_str()))
                        .add(course_rule)
                        .add(class_rule),
                ),
        );
    }

    cond
}

impl SeaOrmStorage {
    /// 加载帖子的目标班级
    async fn load_post_class_ids<C: ConnectionTrait>(
        conn: &C,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<i64>>> {
        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(map);
        }
        let rows = PostClasses::find()
            .filter(post_classes::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(post_classes::Column::Id)
            .all(conn)
            .await?;
        for row in rows {
            map.entry(row.post_id).or_default().push(row.class_id);
        }
        Ok(map)
    }

    async fn into_posts(&self, rows: Vec<PostModel>) -> Result<Vec<Post>> {
        let scoped: Vec<i64> = rows.iter().filter(|p| p.class_scoped).map(|p| p.id).collect();
        let mut class_map = Self::load_post_class_ids(&self.db, &scoped).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let class_ids = class_map.remove(&row.id);
                row.into_post(class_ids)
            })
            .collect())
    }

    pub async fn create_post_impl(
        &self,
        school_id: i64,
        author_id: i64,
        post: &CreatePostRequest,
        attachments: Vec<Attachment>,
    ) -> Result<Post> {
        let txn = self.db.begin().await?;

        // 事务的第一条语句就写学校行：同一学校的发帖在此串行，
        // 时间戳严格递增，游标翻页不会漏掉同一毫秒的帖子
        let now = now_millis();
        let bumped = Schools::update_many()
            .col_expr(
                schools::Column::LastPostAt,
                Expr::cust_with_values(
                    "CASE WHEN last_post_at >= ? THEN last_post_at + 1 ELSE ? END",
                    [now, now],
                ),
            )
            .filter(schools::Column::Id.eq(school_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新发帖时钟失败: {e}")))?;
        if bumped.rows_affected == 0 {
            return Err(SchoolHubError::not_found("School not found"));
        }
        let created_at = Schools::find_by_id(school_id)
            .one(&txn)
            .await?
            .map(|school| school.last_post_at)
            .ok_or_else(|| SchoolHubError::not_found("School not found"))?;

        let class_ids = post.normalized_class_ids();
        let marking_criteria = match &post.marking_criteria {
            Some(criteria) => Some(serde_json::to_string(criteria)?),
            None => None,
        };

        let model = posts::ActiveModel {
            school_id: Set(school_id),
            year_group_id: Set(post.year_group_id),
            course_id: Set(post.course_id),
            author_id: Set(author_id),
            visibility: Set(post.visibility.as_str().to_string()),
            post_type: Set(post.post_type.as_str().to_string()),
            title: Set(post.title.trim().to_string()),
            content: Set(post.content.clone()),
            attachments: Set(serde_json::to_string(&attachments)?),
            marking_criteria: Set(marking_criteria),
            class_scoped: Set(class_ids.is_some()),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建帖子失败: {e}")))?;

        if let Some(ids) = &class_ids {
            for class_id in ids {
                post_classes::ActiveModel {
                    post_id: Set(model.id),
                    class_id: Set(*class_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("保存帖子目标班级失败: {e}"))
                })?;
            }
        }

        txn.commit().await?;
        Ok(model.into_post(class_ids))
    }

    pub async fn get_post_impl(&self, school_id: i64, post_id: i64) -> Result<Option<Post>> {
        let row = Posts::find_by_id(post_id)
            .filter(posts::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询帖子失败: {e}")))?;

        match row {
            Some(row) => Ok(self.into_posts(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 按 (created_at DESC, id DESC) 读取 `before` 之前的帖子
    pub async fn list_feed_impl(
        &self,
        scope: &FeedScope,
        before: i64,
        fetch: u64,
    ) -> Result<Vec<Post>> {
        let rows = Posts::find()
            .filter(feed_condition(scope, before))
            .order_by_desc(posts::Column::CreatedAt)
            .order_by_desc(posts::Column::Id)
            .limit(fetch)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询信息流失败: {e}")))?;

        self.into_posts(rows).await
    }

    pub async fn delete_post_impl(&self, post_id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        Submissions::delete_many()
            .filter(submissions::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        PostClasses::delete_many()
            .filter(post_classes::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        let result = Posts::delete_by_id(post_id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除帖子失败: {e}")))?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{file_storage, memory_storage, remove_db_files, user};
    use futures_util::future::join_all;
    use super::*;
    use crate::models::posts::entities::PostType;
    use crate::models::schools::entities::{ClassMemberStatus, SchoolRole};

    struct Fixture {
        storage: SeaOrmStorage,
        school_id: i64,
        year_group_id: i64,
        course_id: i64,
        class_a: i64,
        class_b: i64,
        teacher: i64,
        student: i64,
    }

    async fn fixture() -> Fixture {
        fixture_on(memory_storage().await).await
    }

    async fn fixture_on(storage: SeaOrmStorage) -> Fixture {
        let teacher = user(&storage, "tess").await;
        let student = user(&storage, "sam").await;
        let school = storage.create_school_impl("Northside", teacher.id).await.unwrap();
        storage
            .add_invitations_impl(school.id, &[student.email.clone()], SchoolRole::Student, teacher.id)
            .await
            .unwrap();
        storage
            .accept_invitation_impl(school.id, student.id, &student.email)
            .await
            .unwrap();
        let yg = storage.create_year_group_impl(school.id, "Year 7").await.unwrap();
        let course = storage.create_course_impl(school.id, yg.id, "Maths").await.unwrap();
        let a = storage
            .create_class_impl(school.id, course.id, "7A", Some(teacher.id))
            .await
            .unwrap();
        let b = storage
            .create_class_impl(school.id, course.id, "7B", Some(teacher.id))
            .await
            .unwrap();
        storage
            .set_class_member_impl(school.id, a.id, student.id, ClassMemberStatus::Student)
            .await
            .unwrap();
        Fixture {
            storage,
            school_id: school.id,
            year_group_id: yg.id,
            course_id: course.id,
            class_a: a.id,
            class_b: b.id,
            teacher: teacher.id,
            student: student.id,
        }
    }

    fn request(
        f: &Fixture,
        course: bool,
        classes: Option<Vec<i64>>,
        visibility: PostVisibility,
    ) -> CreatePostRequest {
        CreatePostRequest {
            year_group_id: f.year_group_id,
            course_id: course.then_some(f.course_id),
            class_ids: classes,
            visibility,
            post_type: PostType::Post,
            title: "Notice".into(),
            content: String::new(),
            attachments: vec![],
            marking_criteria: None,
        }
    }

    async fn feed_ids(f: &Fixture, user_id: i64, class_ids: Option<Vec<i64>>) -> Vec<i64> {
        let school = f.storage.get_school_impl(f.school_id).await.unwrap().unwrap();
        let course = class_ids.as_ref().map(|_| f.course_id);
        let scope = FeedScope::resolve(&school, user_id, f.year_group_id, course, class_ids)
            .unwrap();
        let posts = f
            .storage
            .list_feed_impl(&scope, i64::MAX, 100)
            .await
            .unwrap();
        // 数据库过滤与内存规则一致
        assert!(posts.iter().all(|p| scope.matches(p)));
        posts.into_iter().map(|p| p.id).collect()
    }

    #[actix_web::test]
    async fn test_feed_filters_for_student() {
        let f = fixture().await;
        let s = &f.storage;
        let to_a = s
            .create_post_impl(f.school_id, f.teacher, &request(&f, true, Some(vec![f.class_a]), PostVisibility::Public), vec![])
            .await
            .unwrap();
        let to_b = s
            .create_post_impl(f.school_id, f.teacher, &request(&f, true, Some(vec![f.class_b]), PostVisibility::Public), vec![])
            .await
            .unwrap();
        let course_wide = s
            .create_post_impl(f.school_id, f.teacher, &request(&f, true, None, PostVisibility::Public), vec![])
            .await
            .unwrap();
        let private = s
            .create_post_impl(f.school_id, f.teacher, &request(&f, true, Some(vec![f.class_a]), PostVisibility::Private), vec![])
            .await
            .unwrap();
        let own_private = s
            .create_post_impl(f.school_id, f.student, &request(&f, true, Some(vec![f.class_a]), PostVisibility::Private), vec![])
            .await
            .unwrap();

        assert_eq!(
            feed_ids(&f, f.student, None).await,
            vec![own_private.id, course_wide.id, to_a.id]
        );
        assert_eq!(
            feed_ids(&f, f.teacher, None).await,
            vec![own_private.id, private.id, course_wide.id, to_b.id, to_a.id]
        );
        assert_eq!(
            feed_ids(&f, f.teacher, Some(vec![f.class_b])).await,
            vec![course_wide.id, to_b.id]
        );
    }

    #[actix_web::test]
    async fn test_timestamps_strictly_increase_and_delete() {
        let f = fixture().await;
        let req = request(&f, false, None, PostVisibility::Public);
        let first = f.storage.create_post_impl(f.school_id, f.teacher, &req, vec![]).await.unwrap();
        let second = f.storage.create_post_impl(f.school_id, f.teacher, &req, vec![]).await.unwrap();
        assert!(second.created_at > first.created_at);

        let loaded = f.storage.get_post_impl(f.school_id, first.id).await.unwrap().unwrap();
        assert_eq!(loaded, first);
        assert!(f.storage.get_post_impl(f.school_id + 1, first.id).await.unwrap().is_none());

        assert!(f.storage.delete_post_impl(first.id).await.unwrap());
        assert!(f.storage.get_post_impl(f.school_id, first.id).await.unwrap().is_none());
        assert!(!f.storage.delete_post_impl(first.id).await.unwrap());
    }

    #[actix_web::test]
    async fn test_concurrent_posts_get_distinct_timestamps() {
        let (storage, path) = file_storage(8).await;
        let f = fixture_on(storage).await;
        let req = request(&f, true, Some(vec![f.class_a]), PostVisibility::Public);

        let results = join_all(
            (0..8).map(|_| f.storage.create_post_impl(f.school_id, f.teacher, &req, vec![])),
        )
        .await;
        let mut stamps: Vec<i64> = results
            .into_iter()
            .map(|r| r.expect("concurrent create").created_at)
            .collect();
        stamps.sort_unstable();
        stamps.dedup();
        assert_eq!(stamps.len(), 8);

        // 翻页时不会因为时间戳相同而漏帖
        let school = f.storage.get_school_impl(f.school_id).await.unwrap().unwrap();
        let scope = FeedScope::resolve(&school, f.teacher, f.year_group_id, None, None).unwrap();
        let first = f.storage.list_feed_impl(&scope, i64::MAX, 4).await.unwrap();
        let rest = f
            .storage
            .list_feed_impl(&scope, first[3].created_at, 100)
            .await
            .unwrap();
        assert_eq!(first.len() + rest.len(), 8);

        remove_db_files(&path);
    }
}
