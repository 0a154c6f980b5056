mod common;

use actix_web::http::StatusCode;
use serde_json::{Value, json};

use common::*;
use schoolhub::provider::MockIdentityProvider;

fn post_ids(body: &Value) -> Vec<i64> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

async fn create_post(
    server: &TestServer,
    token: &str,
    f: &SchoolFixture,
    extra: Value,
) -> (StatusCode, Value) {
    let mut body = json!({
        "year_group_id": f.year_group_id,
        "course_id": f.course_id,
        "visibility": "public",
        "post_type": "post",
        "title": "Notice",
        "content": "Bring a calculator",
    });
    for (key, value) in extra.as_object().unwrap() {
        body[key] = value.clone();
    }
    server
        .post(token, &format!("{}/posts", f.base()), body)
        .await
}

#[actix_web::test]
async fn test_feed_pages_without_gaps_or_duplicates() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;

    let mut created = Vec::new();
    for i in 0..25 {
        let (status, body) =
            create_post(&server, TEACHER, &f, json!({ "title": format!("Post {i}") })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        created.push(body["data"]["id"].as_i64().unwrap());
    }
    created.reverse();

    let mut seen = Vec::new();
    let mut before: Option<i64> = None;
    let mut pages = 0;
    loop {
        let mut uri = format!(
            "{}/posts?year_group_id={}&course_id={}&limit=10",
            f.base(),
            f.year_group_id,
            f.course_id
        );
        if let Some(before) = before {
            uri.push_str(&format!("&before={before}"));
        }
        let (status, body) = server.get(ALICE, &uri).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        pages += 1;

        let items = body["data"]["items"].as_array().unwrap();
        seen.extend(post_ids(&body));
        if body["data"]["is_end"].as_bool().unwrap() {
            break;
        }
        assert_eq!(items.len(), 10);
        before = items.last().unwrap()["created_at"].as_i64();
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, created);
}

#[actix_web::test]
async fn test_feed_visibility_for_students() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;

    let (_, body) = create_post(&server, TEACHER, &f, json!({})).await;
    let course_wide = body["data"]["id"].as_i64().unwrap();
    let (_, body) = create_post(&server, TEACHER, &f, json!({ "visibility": "private" })).await;
    let private = body["data"]["id"].as_i64().unwrap();
    let (_, body) = create_post(&server, TEACHER, &f, json!({ "class_ids": [f.class_b] })).await;
    let for_b = body["data"]["id"].as_i64().unwrap();
    let (status, body) =
        create_post(&server, ALICE, &f, json!({ "class_ids": [f.class_a] })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let by_alice = body["data"]["id"].as_i64().unwrap();

    let feed = format!(
        "{}/posts?year_group_id={}&course_id={}",
        f.base(),
        f.year_group_id,
        f.course_id
    );

    let (_, body) = server.get(TEACHER, &feed).await;
    assert_eq!(post_ids(&body), vec![by_alice, for_b, private, course_wide]);
    assert!(body["data"]["is_end"].as_bool().unwrap());

    let (_, body) = server.get(ALICE, &feed).await;
    assert_eq!(post_ids(&body), vec![by_alice, course_wide]);

    let (_, body) = server.get(BOB, &feed).await;
    assert_eq!(post_ids(&body), vec![for_b, course_wide]);

    // 私有帖子和其他班级的帖子按不存在处理
    let (status, _) = server
        .get(ALICE, &format!("{}/posts/{private}", f.base()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server
        .get(ALICE, &format!("{}/posts/{for_b}", f.base()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 按班级筛选时保留面向整个课程的帖子
    let (_, body) = server
        .get(TEACHER, &format!("{feed}&class_ids={}", f.class_b))
        .await;
    assert_eq!(post_ids(&body), vec![for_b, private, course_wide]);

    // 学生不能筛选别的班级
    let (status, _) = server
        .get(ALICE, &format!("{feed}&class_ids={}", f.class_b))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server
        .get(ALICE, &format!("{feed}&class_ids=abc"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_student_post_restrictions() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;

    let (status, _) = create_post(&server, ALICE, &f, json!({ "class_ids": [f.class_b] })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = create_post(
        &server,
        ALICE,
        &f,
        json!({ "class_ids": [f.class_a], "post_type": "material" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 学生必须指定班级
    let (status, _) = create_post(&server, ALICE, &f, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 班级不属于该课程是结构错误
    let (status, _) = create_post(
        &server,
        TEACHER,
        &f,
        json!({ "course_id": f.course_id, "class_ids": [999999] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_post(&server, OUTSIDER, &f, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_assignment_submission_and_marking() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    let (status, body) = create_post(
        &server,
        TEACHER,
        &f,
        json!({
            "post_type": "assignment",
            "title": "Fractions worksheet",
            "attachments": [{ "name": "worksheet.pdf", "path": "/maths/worksheet.pdf" }],
            "marking_criteria": [
                { "title": "Accuracy", "max_marks": 10.0 },
                { "title": "Working", "max_marks": 5.0 }
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let post_id = body["data"]["id"].as_i64().unwrap();
    let url = body["data"]["attachments"][0]["url"].as_str().unwrap();
    assert!(url.starts_with("https://share.mock.local/"));

    // 学生通过自己的令牌解析附件
    let (status, body) = server
        .get(ALICE, &format!("{base}/posts/{post_id}/attachments/0"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "worksheet.pdf");
    assert!(body["data"]["url"].as_str().unwrap().ends_with("dl=1"));
    let (status, _) = server
        .get(ALICE, &format!("{base}/posts/{post_id}/attachments/3"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let submission = format!("{base}/posts/{post_id}/submission");
    let (status, _) = server
        .put(TEACHER, &submission, json!({ "content": "teacher answer" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server.put(ALICE, &submission, json!({ "content": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put(ALICE, &submission, json!({ "content": "first draft" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, body) = server
        .put(
            ALICE,
            &submission,
            json!({
                "content": "final answer",
                "attachments": [{ "name": "answers.pdf", "path": "/answers.pdf" }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["content"], "final answer");
    assert!(body["data"]["marks"].is_null());

    let marks = format!("{base}/posts/{post_id}/submissions/{}/marks", f.alice);
    let (status, _) = server
        .put(TEACHER, &marks, json!({ "marks": [11.0, 2.0] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = server.put(TEACHER, &marks, json!({ "marks": [8.0] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = server
        .put(ALICE, &marks, json!({ "marks": [10.0, 5.0] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server
        .put(
            TEACHER,
            &marks,
            json!({ "marks": [8.5, 4.0], "feedback": "Show each step" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["marks"], json!([8.5, 4.0]));
    assert_eq!(body["data"]["marked_by"], f.teacher);

    // bob 没有提交
    let (status, _) = server
        .put(
            TEACHER,
            &format!("{base}/posts/{post_id}/submissions/{}/marks", f.bob),
            json!({ "marks": [1.0, 1.0] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 一名学生一条提交，学生只看到自己的
    let (_, body) = server.put(BOB, &submission, json!({ "content": "bob" })).await;
    assert_eq!(body["data"]["student_id"], f.bob);
    let (_, teacher_view) = server.get(TEACHER, &format!("{base}/posts/{post_id}")).await;
    assert_eq!(teacher_view["data"]["submissions"].as_array().unwrap().len(), 2);
    let (_, alice_view) = server.get(ALICE, &format!("{base}/posts/{post_id}")).await;
    let own = alice_view["data"]["submissions"].as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["student_id"], f.alice);
    assert_eq!(own[0]["feedback"], "Show each step");
}

#[actix_web::test]
async fn test_sharing_failure_is_internal_error() {
    let server = TestServer::with_provider(MockIdentityProvider::with_failing_sharing()).await;
    let f = setup_school(&server).await;

    let (status, body) = create_post(
        &server,
        TEACHER,
        &f,
        json!({ "attachments": [{ "name": "notes.pdf", "path": "/notes.pdf" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 1005);
    assert!(body["message"].as_str().unwrap().contains("ref:"));

    // 没有附件的帖子不受影响
    let (status, _) = create_post(&server, TEACHER, &f, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn test_delete_permissions() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;
    let base = f.base();

    let (_, body) = create_post(&server, ALICE, &f, json!({ "class_ids": [f.class_a] })).await;
    let by_alice = body["data"]["id"].as_i64().unwrap();
    let (_, body) = create_post(&server, TEACHER, &f, json!({})).await;
    let by_teacher = body["data"]["id"].as_i64().unwrap();

    let (status, _) = server
        .delete(ALICE, &format!("{base}/posts/{by_teacher}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server
        .delete(TEACHER, &format!("{base}/posts/{by_alice}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .delete(ALICE, &format!("{base}/posts/{by_alice}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server
        .delete(ADMIN, &format!("{base}/posts/{by_teacher}"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .get(ADMIN, &format!("{base}/posts/{by_teacher}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_revoked_token_is_rejected() {
    let server = TestServer::new().await;
    let f = setup_school(&server).await;

    // 会话缓存仍然有效
    server.provider.revoke(ALICE);
    let (status, _) = server.get(ALICE, &f.base()).await;
    assert_eq!(status, StatusCode::OK);

    // 未缓存的令牌直接被拒绝
    server.provider.add_user("tok-carol", "dbid:carol", "Carol", "carol@school.test");
    server.provider.revoke("tok-carol");
    let (status, _) = server.get("tok-carol", &f.base()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
