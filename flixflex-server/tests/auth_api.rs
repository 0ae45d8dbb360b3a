use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;
use support::{bearer, build_test_app, register_and_login};

#[tokio::test]
async fn signup_then_login_issues_a_token() -> Result<()> {
    let app = build_test_app()?;
    let credentials = json!({"username": "trinity", "password": "Password#123"});

    let signup = app.server.post("/api/auth/signup").json(&credentials).await;
    signup.assert_status(StatusCode::CREATED);

    let login = app.server.post("/api/auth/login").json(&credentials).await;
    login.assert_status_ok();
    let body: Value = login.json();
    let token = body["token"].as_str().unwrap_or_default();
    let claims = app.state.jwt.validate(token)?;
    assert_eq!(claims.username, "trinity");
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_conflicts() -> Result<()> {
    let app = build_test_app()?;
    let credentials = json!({"username": "morpheus", "password": "Password#123"});

    app.server
        .post("/api/auth/signup")
        .json(&credentials)
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/auth/signup")
        .json(&credentials)
        .await
        .assert_status(StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn signup_requires_credentials() -> Result<()> {
    let app = build_test_app()?;

    app.server
        .post("/api/auth/signup")
        .json(&json!({"username": "", "password": "x"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .post("/api/auth/signup")
        .json(&json!({"username": "no-password"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_distinguishes_unknown_users_from_bad_passwords() -> Result<()> {
    let app = build_test_app()?;
    register_and_login(&app.server, "oracle").await;

    app.server
        .post("/api/auth/login")
        .json(&json!({"username": "nobody", "password": "Password#123"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/api/auth/login")
        .json(&json!({"username": "oracle", "password": "wrong"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_token() -> Result<()> {
    let app = build_test_app()?;

    app.server
        .get("/api/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/api/auth/me")
        .add_header("Authorization", bearer("not-a-jwt"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn me_returns_username_and_favorites() -> Result<()> {
    let app = build_test_app()?;
    let token = register_and_login(&app.server, "switch").await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "switch");
    assert_eq!(body["favorites"], json!([]));
    Ok(())
}
