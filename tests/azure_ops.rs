mod common;

use std::time::Duration;

use cloudcraft::{
    Cloudcraft,
    types::{
        AzureAccountId, CloudcraftConfig, CloudcraftError, DeleteAzureAccountInput,
        ErrorResponse,
    },
};
use common::{API_KEY, account_path, cloudcraft, config};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, header, method, path},
};

#[tokio::test]
async fn delete_account() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("acc-123")))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .and(header("accept", "application/json"))
        .and(header(
            "user-agent",
            concat!("cloudcraft-rust/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    cloudcraft(&server)
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-123".parse()?))
        .await?;

    Ok(())
}

#[tokio::test]
async fn delete_account_with_custom_user_agent() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("acc-123")))
        .and(header("user-agent", "my-tool/1.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let cloudcraft = Cloudcraft::new(config(&server).with_user_agent("my-tool/1.0")?)?;
    cloudcraft
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-123".parse()?))
        .await?;

    Ok(())
}

#[tokio::test]
async fn account_id_is_percent_encoded_in_path() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("My%20Account")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    cloudcraft(&server)
        .azure()
        .delete_account(DeleteAzureAccountInput::new("My Account".parse()?))
        .await?;

    Ok(())
}

#[tokio::test]
async fn dotted_account_ids_stay_in_account_path() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let azure = cloudcraft(&server).azure();
    for id in ["...", ".hidden", "%2e%2e"] {
        azure
            .delete_account(DeleteAzureAccountInput::new(id.parse()?))
            .await?;
    }

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_owned())
        .collect();
    assert_eq!(
        paths,
        [
            account_path("..."),
            account_path(".hidden"),
            account_path("%252e%252e"),
        ]
    );

    Ok(())
}

#[test]
fn dot_segment_account_ids_are_rejected() {
    for id in [".", ".."] {
        let err = id.parse::<AzureAccountId>().unwrap_err();
        assert!(err.to_string().contains("dot segment"));
    }
}

#[tokio::test]
async fn endpoint_base_path_is_prepended() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/providers/azure/account/acc-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/v1", server.uri()).parse()?;
    let cloudcraft = Cloudcraft::new(CloudcraftConfig::new(API_KEY).with_endpoint(endpoint))?;
    cloudcraft
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-1".parse()?))
        .await?;

    Ok(())
}

#[tokio::test]
async fn not_found_is_a_server_error() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "error": "Not Found",
            "message": "Account not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = cloudcraft(&server)
        .azure()
        .delete_account(DeleteAzureAccountInput::new("missing".parse()?))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CloudcraftError::Server(ErrorResponse { status: 404, .. })
    ));
    assert_eq!(
        err.to_string(),
        "request failed with status 404: Account not found"
    );

    Ok(())
}

#[tokio::test]
async fn not_found_ignored_when_requested() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("missing")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    cloudcraft(&server)
        .azure()
        .delete_account(
            DeleteAzureAccountInput::new("missing".parse()?).with_ignore_not_found(true),
        )
        .await?;

    Ok(())
}

#[tokio::test]
async fn server_failure_is_not_retried() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(account_path("acc-123")))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance in progress"))
        .expect(1)
        .mount(&server)
        .await;

    let err = cloudcraft(&server)
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-123".parse()?))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "request failed with status 503: maintenance in progress"
    );

    Ok(())
}

#[tokio::test]
async fn request_timeout() -> Result<(), CloudcraftError> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let cloudcraft =
        Cloudcraft::new(config(&server).with_request_timeout(Duration::from_millis(100)))?;
    let err = cloudcraft
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-123".parse()?))
        .await
        .unwrap_err();

    assert!(matches!(&err, CloudcraftError::Client(msg) if msg == "timeout"));

    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_a_client_error() -> Result<(), CloudcraftError> {
    let endpoint = "http://127.0.0.1:1".parse()?;
    let cloudcraft = Cloudcraft::new(CloudcraftConfig::new(API_KEY).with_endpoint(endpoint))?;
    let err = cloudcraft
        .azure()
        .delete_account(DeleteAzureAccountInput::new("acc-123".parse()?))
        .await
        .unwrap_err();

    assert!(matches!(err, CloudcraftError::Client(_)));

    Ok(())
}

#[test]
fn client_construction_rejects_bad_api_keys() {
    let err = Cloudcraft::new(CloudcraftConfig::new("")).unwrap_err();
    assert_eq!(err.to_string(), "missing API key");

    let err = Cloudcraft::new(CloudcraftConfig::new("bad\nkey")).unwrap_err();
    assert!(matches!(err, CloudcraftError::Client(_)));
}
