//! Integration tests for self-service profile flows

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, json_request, seed_user, spawn_app, token_for, TEST_PASSWORD};
use concours_auth::Role;
use serde_json::json;
use tower::ServiceExt;

fn cookie_token(cookie: &str) -> &str {
    cookie
        .split(';')
        .next()
        .and_then(|c| c.strip_prefix("concours_session="))
        .expect("session cookie shape")
}

#[tokio::test]
async fn test_profile_edit_patches_live_session() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "editor", Role::Vendor).await;
    let token = token_for(&harness.keys, id, "editor", Role::Vendor);
    let original = harness.keys.resolve(&token).unwrap();

    let response = harness
        .app
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            json!({ "display_name": "Eddie Editor", "email": "eddie@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("edit must re-issue the session cookie")
        .to_string();

    let body = body_json(response).await;
    assert_eq!(body["display_name"], "Eddie Editor");
    assert_eq!(body["email"], "eddie@example.com");

    // The re-signed token reflects the edit without a new login, while
    // identity, role and the original expiry are untouched.
    let patched = harness.keys.resolve(cookie_token(&cookie)).unwrap();
    assert_eq!(patched.name, "Eddie Editor");
    assert_eq!(patched.email, "eddie@example.com");
    assert_eq!(patched.sub, original.sub);
    assert_eq!(patched.role, original.role);
    assert_eq!(patched.exp, original.exp);
}

#[tokio::test]
async fn test_password_change_requires_current_password() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "cautious", Role::User).await;
    let token = token_for(&harness.keys, id, "cautious", Role::User);

    // Wrong current password: rejected, nothing written
    let rejected = harness
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile/password",
            Some(&token),
            json!({ "current_password": "NotMyPassword1!", "new_password": "BrandNewSecret1!" }),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let still_old = harness
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "cautious", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(still_old.status(), StatusCode::OK);

    // Correct current password: the change takes
    let accepted = harness
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile/password",
            Some(&token),
            json!({ "current_password": TEST_PASSWORD, "new_password": "BrandNewSecret1!" }),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::NO_CONTENT);

    let old_fails = harness
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "cautious", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(old_fails.status(), StatusCode::UNAUTHORIZED);

    let new_works = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "cautious", "password": "BrandNewSecret1!" }),
        ))
        .await
        .unwrap();
    assert_eq!(new_works.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_weak_new_password_rejected_without_partial_write() {
    let harness = spawn_app().await;
    let id = seed_user(&harness.db, "brief", Role::User).await;
    let token = token_for(&harness.keys, id, "brief", Role::User);

    let response = harness
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile/password",
            Some(&token),
            json!({ "current_password": TEST_PASSWORD, "new_password": "tiny" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The old password still logs in
    let login = harness
        .app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "brief", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
}
