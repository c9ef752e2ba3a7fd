//! Integration tests for authentication endpoints

mod common;

use axum::http::{header, StatusCode};
use chrono::Utc;
use common::{body_json, json_request, seed_user, spawn_app, token_for, TEST_PASSWORD};
use concours_auth::Role;
use concours_db::entities::user;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde_json::json;
use tower::ServiceExt; // For `oneshot` method

#[tokio::test]
async fn test_registration_success_sets_session_cookie() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "jdoe",
                "password": TEST_PASSWORD,
                "display_name": "Jane Doe",
                "email": "jdoe@example.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("registration must set the session cookie")
        .to_string();
    assert!(cookie.starts_with("concours_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "jdoe");
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["is_active"], true);
    assert!(body["token"].as_str().unwrap().starts_with("eyJ"));
}

#[tokio::test]
async fn test_registration_ignores_submitted_role() {
    // Privilege-escalation guard: a role field in the body changes nothing
    let harness = spawn_app().await;

    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "sneaky",
                "password": TEST_PASSWORD,
                "display_name": "Sneaky",
                "email": "sneaky@example.com",
                "role": "admin"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "user");

    // The stored row agrees
    let stored = user::Entity::find()
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, user::UserRole::User);
}

#[tokio::test]
async fn test_registration_duplicate_username_conflict() {
    let harness = spawn_app().await;

    let request = || {
        json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "dupe",
                "password": TEST_PASSWORD,
                "display_name": "Dupe",
                "email": "dupe@example.com"
            }),
        )
    };

    let first = harness.app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = harness.app.oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["error"].as_str().unwrap().contains("dupe"));
}

#[tokio::test]
async fn test_registration_weak_password_rejected() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "weakling",
                "password": "short",
                "display_name": "Weak",
                "email": "weak@example.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_registration_invalid_email_rejected() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "bademail",
                "password": TEST_PASSWORD,
                "display_name": "Bad",
                "email": "not-an-email"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let harness = spawn_app().await;
    seed_user(&harness.db, "driver", Role::User).await;

    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "driver", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "driver");
    assert!(body["token"].as_str().unwrap().starts_with("eyJ"));
}

#[tokio::test]
async fn test_login_failure_is_uniform_for_unknown_user_and_wrong_password() {
    // Anti-enumeration: both failure modes produce the same status, code
    // and message.
    let harness = spawn_app().await;
    seed_user(&harness.db, "driver", Role::User).await;

    let unknown = harness
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    let wrong = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "driver", "password": "WrongPassword123!" }),
        ))
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown_body = body_json(unknown).await;
    let wrong_body = body_json(wrong).await;
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_deactivated_account_cannot_login() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "benched", Role::Judge).await;

    let row = user::Entity::find_by_id(id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    let mut active = row.into_active_model();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(&harness.db).await.unwrap();

    // Correct credential, deactivated account: same failure as a bad one
    let response = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "benched", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_current_user_round_trip() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "whoami", Role::Registrar).await;
    let token = token_for(&harness.keys, id, "whoami", Role::Registrar);

    let response = harness
        .app
        .oneshot(json_request(
            "GET",
            "/api/auth/me",
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["role"], "registrar");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let harness = spawn_app().await;

    let response = harness
        .app
        .oneshot(json_request("POST", "/api/auth/logout", None, json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_tampered_token_is_treated_as_anonymous() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "victim", Role::Admin).await;
    let token = token_for(&harness.keys, id, "victim", Role::Admin);

    // Flip one character in the payload segment
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let payload = parts[1].clone();
    let mid = payload.len() / 2;
    let mut bytes = payload.into_bytes();
    bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
    parts[1] = String::from_utf8(bytes).unwrap();
    let tampered = parts.join(".");

    let response = harness
        .app
        .oneshot(json_request(
            "GET",
            "/api/auth/me",
            Some(&tampered),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}
