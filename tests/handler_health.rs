mod common;

#[tokio::test]
async fn test_health_endpoint_success() {
    let state = common::create_test_state();
    let server = common::create_test_server(&state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["storage"]["message"], "memory connected");
    assert_eq!(json["checks"]["moderation"]["message"], "2 banned words");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let state = common::create_test_state();
    let server = common::create_test_server(&state);

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
    assert!(json["checks"].get("moderation").is_some());
}
