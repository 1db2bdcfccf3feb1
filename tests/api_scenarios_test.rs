//! Functional scenarios against an emulated reqres API

use anyhow::Result;
use apiprobe_integration_tests::{reqres_emulator, RecordingRuntime, Workspace, CREATED_USER_ID};
use apiprobe_session::{HttpResponse, Placeholders, TestSession};
use serde_json::Value;
use wiremock::MockServer;

async fn session_against(api: &MockServer) -> Result<(Workspace, TestSession)> {
    let workspace = Workspace::new(&api.uri(), "http://localhost:8080")?;
    let session = workspace
        .session()
        .start_with_runtime(RecordingRuntime::new())
        .await?;
    Ok((workspace, session))
}

#[tokio::test]
async fn test_login_with_valid_credentials_returns_token() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    let credentials = session.data().get_data("users", Some("valid_user"))?.clone();
    let response = client.post("/login", Some(&credentials), None).await?;

    assert_eq!(response.status(), 200);
    let body = response.json()?;
    assert!(body.get("token").and_then(Value::as_str).is_some());

    // The session client authenticated during construction
    assert_eq!(client.token(), Some("QpwL5tke4Pnpja7X4"));
    println!("✅ Login returned a token");
    Ok(())
}

#[tokio::test]
async fn test_login_with_invalid_credentials_is_rejected() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    let credentials = session.data().get_data("users", Some("invalid_user"))?.clone();
    let response = client.post("/login", Some(&credentials), None).await?;

    assert!(matches!(response.status(), 400 | 401));
    assert!(response.json()?.get("error").is_some());
    Ok(())
}

#[tokio::test]
async fn test_list_users_second_page() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    let page = session.endpoint("users_page", &Placeholders::new().with("page", 2))?;
    let response = client.get(&page, None).await?;

    assert_eq!(response.status(), 200);
    let body = response.json()?;
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 6);
    assert_eq!(body["total"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(6));
    Ok(())
}

#[tokio::test]
async fn test_create_then_delete_user() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    let new_user = session.data().get_data("users", Some("new_user"))?.clone();
    let create_path = session.endpoint("create_user", &Placeholders::new())?;
    let created = client.post(&create_path, Some(&new_user), None).await?;

    assert_eq!(created.status(), 201);
    let id = created
        .json()?
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .expect("created user has an id");
    assert_eq!(id, CREATED_USER_ID);

    let user_path = session.endpoint("delete_user", &Placeholders::new().with("user_id", &id))?;
    let deleted = client.delete(&user_path, None).await?;
    assert_eq!(deleted.status(), 204);
    assert!(deleted.body().is_empty());

    let fetched = client.get(&user_path, None).await?;
    assert_eq!(fetched.status(), 404);
    println!("✅ User {} created and removed", id);
    Ok(())
}

#[tokio::test]
async fn test_unknown_user_is_404_with_empty_object() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    let missing = session.data().get_data("contract", Some("missing_user_id"))?.clone();
    let path = session.endpoint("users_by_id", &Placeholders::new().with("user_id", missing))?;
    let response = client.get(&path, None).await?;

    assert_eq!(response.status(), 404);
    assert_eq!(response.json()?, serde_json::json!({}));
    Ok(())
}

#[tokio::test]
async fn test_requests_carry_session_token() -> Result<()> {
    let api = reqres_emulator().await;
    let (_workspace, session) = session_against(&api).await?;
    let client = session.api_client().await?;

    client.get("/users/2", None).await?;

    let requests = api.received_requests().await.unwrap_or_default();
    let user_request = requests
        .iter()
        .find(|request| request.url.path() == "/users/2")
        .expect("request reached the API");
    assert_eq!(
        user_request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok()),
        Some("Bearer QpwL5tke4Pnpja7X4")
    );
    Ok(())
}
