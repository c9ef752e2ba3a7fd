//! Shared helpers for API integration tests

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::Utc;
use concours_api::{ApiServer, ApiServerConfig};
use concours_auth::{hash_password, Role, SessionClaims, SessionKeys};
use concours_db::entities::user;
use concours_media::MediaStore;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "SecurePassword123!";

/// A router over an in-memory database and a temp media root
pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub keys: SessionKeys,
    pub media_root: std::path::PathBuf,
    // Held so the media root outlives the test
    _media_dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    concours_db::migrate(&db).await.expect("Failed to run migrations");

    let media_dir = tempfile::tempdir().expect("Failed to create media dir");
    let media = MediaStore::init(media_dir.path())
        .await
        .expect("Failed to init media store");

    let config = ApiServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: true,
        session_secret: TEST_SECRET.to_string(),
        previous_session_secrets: Vec::new(),
        allow_signup: true,
    };

    let server = ApiServer::new(config, db.clone(), media);
    TestApp {
        app: server.build_router(),
        db,
        keys: SessionKeys::new(TEST_SECRET, &[]),
        media_root: media_dir.path().to_path_buf(),
        _media_dir: media_dir,
    }
}

/// Insert an account directly and return its id
pub async fn seed_user(db: &DatabaseConnection, username: &str, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(TEST_PASSWORD).expect("hash failed")),
        display_name: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        phone: Set(None),
        role: Set(role.into()),
        is_active: Set(true),
        avatar_url: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to seed user");
    id
}

/// Session token for a seeded account
pub fn token_for(keys: &SessionKeys, id: Uuid, username: &str, role: Role) -> String {
    let claims = SessionClaims::new(
        id.to_string(),
        username.to_string(),
        username.to_string(),
        format!("{}@example.com", username),
        role,
    );
    keys.issue(&claims).expect("Failed to issue token")
}

/// JSON request builder, optionally authenticated via session cookie
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("concours_session={}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Multipart upload request with a single file field
pub fn upload_request(
    uri: &str,
    token: Option<&str>,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\nContent-Type: {}\r\n\r\n",
            content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let mut builder = Request::builder().uri(uri).method("POST").header(
        "content-type",
        format!("multipart/form-data; boundary={}", boundary),
    );
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("concours_session={}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

/// Read a response body into a JSON value
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}
