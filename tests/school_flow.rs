mod common;

use actix_web::http::StatusCode;
use serde_json::{Value, json};

use common::*;

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_school_list_and_invitations() {
    let server = TestServer::new().await;
    let admin = server.user(ADMIN, "Admin").await;
    server.user(ALICE, "Alice").await;

    let (_, body) = server
        .post(ADMIN, "/api/v1/schools", json!({ "name": "  Northside " }))
        .await;
    let school_id = body["data"]["school"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["school"]["name"], "Northside");
    assert_eq!(body["data"]["school"]["role"], "administrator");
    assert_eq!(ids(&body["data"]["school"]["administrators"]), vec![admin]);

    server
        .post(
            ADMIN,
            &format!("/api/v1/schools/{school_id}/invitations"),
            json!({ "emails": ["alice@school.test"], "role": "student" }),
        )
        .await;

    let (status, body) = server.get(ALICE, "/api/v1/schools").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["schools"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["invitations"][0]["school_id"], school_id);
    assert_eq!(body["data"]["invitations"][0]["role"], "student");

    // 拒绝后邀请消失，再次拒绝返回 404
    let decline = format!("/api/v1/schools/{school_id}/invitation/decline");
    let (status, _) = server.post(ALICE, &decline, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.post(ALICE, &decline, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post(
            ALICE,
            &format!("/api/v1/schools/{school_id}/invitation/accept"),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_views_are_filtered_by_role() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    // 管理员：完整结构、邀请列表、用户邮箱
    let (status, admin_view) = server.get(ADMIN, &base).await;
    assert_eq!(status, StatusCode::OK);
    assert!(admin_view["data"]["school"]["invitations"].is_array());
    assert_eq!(
        ids(&admin_view["data"]["school"]["students"]),
        vec![f.alice, f.bob]
    );
    assert!(
        admin_view["data"]["users"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["email"].is_string())
    );

    // 教师：完整结构，没有邀请和邮箱
    let (_, teacher_view) = server.get(TEACHER, &base).await;
    assert!(teacher_view["data"]["school"].get("invitations").is_none());
    let classes = &teacher_view["data"]["school"]["year_groups"][0]["courses"][0]["classes"];
    assert_eq!(classes.as_array().unwrap().len(), 2);
    assert_eq!(ids(&classes[0]["teacher_ids"]), vec![f.teacher]);
    assert!(
        teacher_view["data"]["users"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u.get("email").is_none())
    );

    // 学生：只看到自己的班级和同班同学
    let (_, alice_view) = server.get(ALICE, &base).await;
    let school = &alice_view["data"]["school"];
    let classes = school["year_groups"][0]["courses"][0]["classes"]
        .as_array()
        .unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["id"], f.class_a);
    assert_eq!(ids(&school["students"]), vec![f.alice]);
    assert_eq!(ids(&school["teachers"]), vec![f.teacher]);
    assert!(school.get("invitations").is_none());

    // 校外用户
    let (status, body) = server.get(OUTSIDER, &base).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1004);
    let (status, _) = server.get(OUTSIDER, "/api/v1/schools/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_structure_permissions() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    // 只有管理员能创建年级和课程
    let (status, _) = server
        .post(TEACHER, &format!("{base}/year-groups"), json!({ "name": "Year 8" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server
        .post(ALICE, &format!("{base}/year-groups"), json!({ "name": "Year 8" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server
        .post(ADMIN, &format!("{base}/year-groups"), json!({ "name": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 课程不属于该学校
    let (status, _) = server
        .post(
            ADMIN,
            &format!("{base}/year-groups/999999/courses"),
            json!({ "name": "Art" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 教师维护课程大纲
    let (status, body) = server
        .put(
            TEACHER,
            &format!("{base}/courses/{}/syllabus", f.course_id),
            json!({ "content": "Algebra and geometry", "outcomes": ["Solve equations"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let course = &body["data"]["school"]["year_groups"][0]["courses"][0];
    assert_eq!(course["syllabus"]["content"], "Algebra and geometry");
    assert_eq!(course["syllabus"]["outcomes"][0], "Solve equations");

    let (status, _) = server
        .put(
            ALICE,
            &format!("{base}/courses/{}/syllabus", f.course_id),
            json!({ "content": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 管理员创建的班级没有任课教师
    let (status, body) = server
        .post(
            ADMIN,
            &format!("{base}/courses/{}/classes", f.course_id),
            json!({ "name": "7C" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let class = &body["data"]["school"]["year_groups"][0]["courses"][0]["classes"][2];
    assert_eq!(class["name"], "7C");
    assert!(class["teacher_ids"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_join_request_and_approval() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();
    let join = format!("{base}/classes/{}/requests", f.class_a);

    let (status, body) = server.post(BOB, &join, json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(ids(&body["data"]["school"]["pending_class_ids"]), vec![f.class_a]);

    // 重复申请
    let (status, _) = server.post(BOB, &join, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // 教师不能申请
    let (status, _) = server.post(TEACHER, &join, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, teacher_view) = server.get(TEACHER, &base).await;
    let class_a = &teacher_view["data"]["school"]["year_groups"][0]["courses"][0]["classes"][0];
    assert_eq!(ids(&class_a["pending_ids"]), vec![f.bob]);

    // 其他学生不能审批
    let members = format!("{base}/classes/{}/members", f.class_a);
    let (status, _) = server
        .post(ALICE, &members, json!({ "user_id": f.bob, "status": "student" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server
        .post(TEACHER, &members, json!({ "user_id": f.bob, "status": "student" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let class_a = &body["data"]["school"]["year_groups"][0]["courses"][0]["classes"][0];
    assert!(class_a["pending_ids"].as_array().unwrap().is_empty());
    assert_eq!(ids(&class_a["student_ids"]), vec![f.alice, f.bob]);

    // 同班后 alice 能看到 bob
    let (_, alice_view) = server.get(ALICE, &base).await;
    assert_eq!(
        ids(&alice_view["data"]["school"]["students"]),
        vec![f.alice, f.bob]
    );
}

#[actix_web::test]
async fn test_class_members_must_belong_to_school() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let members = format!("{}/classes/{}/members", f.base(), f.class_a);

    let (status, _) = server
        .post(TEACHER, &members, json!({ "user_id": f.outsider, "status": "student" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 学生不能作为任课教师
    let (status, _) = server
        .post(TEACHER, &members, json!({ "user_id": f.bob, "status": "teacher" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(TEACHER, &members, json!({ "user_id": f.bob, "status": "pending" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_removing_member_clears_class_membership() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    // 非管理员不能移除他人
    let (status, _) = server
        .delete(TEACHER, &format!("{base}/members/{}", f.alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server
        .delete(ADMIN, &format!("{base}/members/{}", f.alice))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let school = &body["data"]["school"];
    assert_eq!(ids(&school["students"]), vec![f.bob]);
    let class_a = &school["year_groups"][0]["courses"][0]["classes"][0];
    assert!(class_a["student_ids"].as_array().unwrap().is_empty());

    let (status, _) = server.get(ALICE, &base).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 学生自己退出
    let (status, _) = server.delete(BOB, &format!("{base}/members/{}", f.bob)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = server.get(ADMIN, &base).await;
    assert!(body["data"]["school"]["students"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_last_administrator_cannot_leave() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;

    let (status, body) = server
        .delete(ADMIN, &format!("{}/members/{}", f.base(), f.admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
}

#[actix_web::test]
async fn test_leaving_a_class() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    // 不能移除别的班级成员
    let (status, _) = server
        .delete(BOB, &format!("{base}/classes/{}/members/{}", f.class_a, f.alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server
        .delete(ALICE, &format!("{base}/classes/{}/members/{}", f.class_a, f.alice))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(
        body["data"]["school"]["year_groups"]
            .as_array()
            .unwrap()
            .is_empty()
    );

    let (status, _) = server
        .delete(ALICE, &format!("{base}/classes/{}/members/{}", f.class_a, f.alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
