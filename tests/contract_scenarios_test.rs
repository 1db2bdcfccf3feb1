//! Contract checks of emulated API responses through the session

use anyhow::Result;
use apiprobe_contract::ContractError;
use apiprobe_integration_tests::{reqres_emulator, RecordingRuntime, Workspace};
use apiprobe_session::{HttpResponse, Placeholders, SchemaName};

#[tokio::test]
async fn test_users_from_data_satisfy_user_contract() -> Result<()> {
    let api = reqres_emulator().await;
    let workspace = Workspace::new(&api.uri(), "http://localhost:8080")?;
    let session = workspace.session().start_with_runtime(RecordingRuntime::new()).await?;
    let client = session.api_client().await?;

    let ids: Vec<u64> = session.data().get_as("contract", Some("user_ids"))?;
    assert!(!ids.is_empty());

    for id in ids {
        let path = session.endpoint("users_by_id", &Placeholders::new().with("user_id", id))?;
        let response = client.get(&path, None).await?;
        assert_eq!(response.status(), 200);

        let mut body = response.json()?;
        session.validate(SchemaName::User, &mut body)?;
        println!("✅ User {} satisfies the user contract", id);
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_email_is_reported_with_its_location() -> Result<()> {
    let api = reqres_emulator().await;
    let workspace = Workspace::new(&api.uri(), "http://localhost:8080")?;
    let session = workspace.session().start_with_runtime(RecordingRuntime::new()).await?;
    let client = session.api_client().await?;

    let id: u64 = session.data().get_as("contract", Some("invalid_email_user"))?;
    let path = session.endpoint("users_by_id", &Placeholders::new().with("user_id", id))?;
    let mut body = client.get(&path, None).await?.json()?;

    let err = session.validate(SchemaName::User, &mut body).unwrap_err();
    assert!(matches!(err, ContractError::Validation { .. }));
    assert!(err
        .violations()
        .iter()
        .any(|violation| violation.instance_path == "/data/email"));
    assert!(err.to_string().contains("not-an-email"));
    Ok(())
}

#[tokio::test]
async fn test_list_and_resource_contracts() -> Result<()> {
    let api = reqres_emulator().await;
    let workspace = Workspace::new(&api.uri(), "http://localhost:8080")?;
    let session = workspace.session().start_with_runtime(RecordingRuntime::new()).await?;
    let client = session.api_client().await?;

    let page = session.endpoint("users_page", &Placeholders::new().with("page", 2))?;
    let mut users = client.get(&page, None).await?.json()?;
    session.validate(SchemaName::ListUsers, &mut users)?;

    let resource_id: u64 = session.data().get_as("contract", Some("resource_id"))?;
    let resource = session.endpoint(
        "unknown_by_id",
        &Placeholders::new().with("resource_id", resource_id),
    )?;
    let mut body = client.get(&resource, None).await?.json()?;
    session.validate(SchemaName::Resource, &mut body)?;

    let resources = session.endpoint("unknown", &Placeholders::new())?;
    let mut body = client.get(&resources, None).await?.json()?;
    session.validate(SchemaName::ListResources, &mut body)?;
    Ok(())
}
