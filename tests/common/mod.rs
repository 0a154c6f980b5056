#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use schoolhub::cache::create_cache;
use schoolhub::config::{
    AppConfig, AppSettings, CacheConfig, CorsConfig, DatabaseConfig, LimitConfig, MemoryConfig,
    ProviderConfig, RedisConfig, ServerConfig, TimeoutConfig,
};
use schoolhub::provider::{IdentityProvider, MockIdentityProvider};
use schoolhub::runtime::lifetime::startup::StartupContext;
use schoolhub::storage::{SeaOrmStorage, Storage};

pub const SECRET: &str = "test-state-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            system_name: "SchoolHub".into(),
            environment: "test".into(),
            log_level: "warn".into(),
        },
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            unix_socket_path: String::new(),
            workers: 1,
            max_workers: 1,
            timeouts: TimeoutConfig {
                client_request: 5000,
                client_disconnect: 1000,
                keep_alive: 30,
            },
            limits: LimitConfig {
                max_payload_size: 1_048_576,
            },
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            pool_size: 1,
            timeout: 5,
        },
        cache: CacheConfig {
            cache_type: "moka".into(),
            default_ttl: 60,
            redis: RedisConfig {
                url: "redis://127.0.0.1:6379".into(),
                key_prefix: "schoolhub-test:".into(),
            },
            memory: MemoryConfig { max_capacity: 1000 },
        },
        cors: CorsConfig {
            allowed_origins: vec![],
            max_age: 60,
        },
        provider: ProviderConfig {
            authorize_url: "https://auth.mock.local/authorize".into(),
            token_url: "https://auth.mock.local/token".into(),
            account_url: "https://auth.mock.local/account".into(),
            share_url: "https://auth.mock.local/share".into(),
            link_url: "https://auth.mock.local/link".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            state_secret: SECRET.into(),
            state_ttl: 600,
            request_timeout: 5,
        },
    }
}

/// 每次请求都用同一份依赖新建 App，数据保存在共享的内存数据库中
pub struct TestServer {
    pub ctx: StartupContext,
    pub provider: Arc<MockIdentityProvider>,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_provider(MockIdentityProvider::new()).await
    }

    pub async fn with_provider(provider: MockIdentityProvider) -> Self {
        let config = test_config();
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::connect(&config.database)
                .await
                .expect("in-memory storage"),
        );
        let cache = create_cache(&config.cache);
        let provider = Arc::new(provider);
        let dyn_provider: Arc<dyn IdentityProvider> = provider.clone();
        Self {
            ctx: StartupContext {
                config,
                storage,
                cache,
                provider: dyn_provider,
            },
            provider,
        }
    }

    pub async fn send(&self, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(App::new().configure(|cfg| self.ctx.configure(cfg))).await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
        req.insert_header(("Authorization", format!("Bearer {token}")))
    }

    pub async fn get(&self, token: &str, uri: &str) -> (StatusCode, Value) {
        self.send(Self::with_token(test::TestRequest::get().uri(uri), token))
            .await
    }

    pub async fn post(&self, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::with_token(
            test::TestRequest::post().uri(uri).set_json(body),
            token,
        ))
        .await
    }

    pub async fn put(&self, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::with_token(
            test::TestRequest::put().uri(uri).set_json(body),
            token,
        ))
        .await
    }

    pub async fn delete(&self, token: &str, uri: &str) -> (StatusCode, Value) {
        self.send(Self::with_token(test::TestRequest::delete().uri(uri), token))
            .await
    }

    /// 注册提供方账户并返回本地用户 ID
    pub async fn user(&self, token: &str, name: &str) -> i64 {
        let email = format!("{}@school.test", name.to_lowercase());
        self.provider
            .add_user(token, &format!("dbid:{token}"), name, &email);
        let (status, body) = self.get(token, "/api/v1/auth/me").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["user"]["id"].as_i64().expect("user id")
    }
}

/// 一所学校：管理员、教师、两名学生（alice 在 7A，bob 在 7B）和一名校外用户
pub struct SchoolFixture {
    pub admin: i64,
    pub teacher: i64,
    pub alice: i64,
    pub bob: i64,
    pub outsider: i64,
    pub school_id: i64,
    pub year_group_id: i64,
    pub course_id: i64,
    pub class_a: i64,
    pub class_b: i64,
}

pub const ADMIN: &str = "tok-admin";
pub const TEACHER: &str = "tok-teacher";
pub const ALICE: &str = "tok-alice";
pub const BOB: &str = "tok-bob";
pub const OUTSIDER: &str = "tok-outsider";

fn first_id(view: &Value, path: &[&str]) -> i64 {
    let mut node = &view["data"]["school"];
    for key in path {
        node = &node[*key][0];
    }
    node["id"].as_i64().expect("id in school view")
}

pub async fn setup_school(server: &TestServer) -> SchoolFixture {
    let admin = server.user(ADMIN, "Admin").await;
    let teacher = server.user(TEACHER, "Teacher").await;
    let alice = server.user(ALICE, "Alice").await;
    let bob = server.user(BOB, "Bob").await;
    let outsider = server.user(OUTSIDER, "Outsider").await;

    let (status, body) = server
        .post(ADMIN, "/api/v1/schools", json!({ "name": "Northside" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let school_id = body["data"]["school"]["id"].as_i64().unwrap();
    let base = format!("/api/v1/schools/{school_id}");

    let (status, body) = server
        .post(ADMIN, &format!("{base}/year-groups"), json!({ "name": "Year 7" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let year_group_id = first_id(&body, &["year_groups"]);

    let (status, body) = server
        .post(
            ADMIN,
            &format!("{base}/year-groups/{year_group_id}/courses"),
            json!({ "name": "Maths" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let course_id = first_id(&body, &["year_groups", "courses"]);

    let (status, body) = server
        .post(
            ADMIN,
            &format!("{base}/invitations"),
            json!({ "emails": ["teacher@school.test"], "role": "teacher" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, body) = server
        .post(
            ADMIN,
            &format!("{base}/invitations"),
            json!({ "emails": ["Alice@School.test", "bob@school.test"], "role": "student" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    for token in [TEACHER, ALICE, BOB] {
        let (status, body) = server
            .post(token, &format!("{base}/invitation/accept"), json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, body) = server
        .post(
            TEACHER,
            &format!("{base}/courses/{course_id}/classes"),
            json!({ "name": "7A" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let class_a = first_id(&body, &["year_groups", "courses", "classes"]);

    let (status, body) = server
        .post(
            TEACHER,
            &format!("{base}/courses/{course_id}/classes"),
            json!({ "name": "7B" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let class_b = body["data"]["school"]["year_groups"][0]["courses"][0]["classes"][1]["id"]
        .as_i64()
        .unwrap();

    for (class_id, student) in [(class_a, alice), (class_b, bob)] {
        let (status, body) = server
            .post(
                TEACHER,
                &format!("{base}/classes/{class_id}/members"),
                json!({ "user_id": student, "status": "student" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    SchoolFixture {
        admin,
        teacher,
        alice,
        bob,
        outsider,
        school_id,
        year_group_id,
        course_id,
        class_a,
        class_b,
    }
}

impl SchoolFixture {
    pub fn base(&self) -> String {
        format!("/api/v1/schools/{}", self.school_id)
    }
}
