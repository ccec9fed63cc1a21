use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;
use void_backend::domain::void::VoidError;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(
        body.get("database").and_then(|v| v.as_str()),
        Some("connected")
    );
    assert_eq!(
        body.get("active_sessions").and_then(|v| v.as_u64()),
        Some(0)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_active_sessions(ctx: &TestContext) {
    ctx.fixtures.create_memos(5);
    ctx.client
        .post_empty("/api/void/sessions")
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("active_sessions").and_then(|v| v.as_u64()),
        Some(1)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_not_ready_when_store_is_down(ctx: &TestContext) {
    ctx.store.fail_with(Some(VoidError::StoreUnavailable(
        "connection refused".to_string(),
    )));

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("not_ready"));
    assert_eq!(
        body.get("database").and_then(|v| v.as_str()),
        Some("disconnected")
    );

    // liveness does not depend on the store
    ctx.client
        .get("/health")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_tag_responses_with_request_id(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "trace-abc-123")])
        .await
        .unwrap();
    assert_eq!(
        response.header("x-request-id").map(String::as_str),
        Some("trace-abc-123")
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let futures = (0..10).map(|_| ctx.client.get("/health/ready"));

    let responses = futures::future::join_all(futures).await;

    for response in responses {
        response.unwrap().assert_status(StatusCode::OK);
    }
}
