//! End-to-end tests for the full controlhubd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`: no TCP port is bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use controlhub_adapter_http_axum::router;
use controlhub_adapter_http_axum::state::AppState;
use controlhub_adapter_storage_sqlite_sqlx::{
    Config, SqliteAclRepository, SqliteConfigurationManager, SqliteScheduler,
    SqliteScriptRepository,
};
use controlhub_app::proxy_registry::ProxyRegistry;
use controlhub_app::service_registry::InProcessServiceRegistry;
use controlhub_app::services::acl_service::AclService;
use controlhub_app::services::proxy_service::ProxyService;
use controlhub_app::services::script_service::ScriptService;
use controlhub_app::services::service_acl_service::ServiceAclService;
use controlhub_app::services::service_catalog::ServiceCatalog;
use controlhub_domain::service::ServiceRecord;

fn record(name: &str, service_type: &str, port: u16) -> ServiceRecord {
    ServiceRecord {
        name: name.to_string(),
        service_type: service_type.to_string(),
        protocol: "http".to_string(),
        address: "localhost".to_string(),
        port,
    }
}

/// Build a fully-wired router backed by an in-memory `SQLite` database, with
/// the `Sine` and `BucketStorage` services registered.
async fn app() -> Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    let acl_repo = Arc::new(SqliteAclRepository::new(pool.clone()));
    let script_repo = Arc::new(SqliteScriptRepository::new(pool.clone()));
    let configuration = Arc::new(SqliteConfigurationManager::new(pool.clone()));
    let scheduler = Arc::new(SqliteScheduler::new(pool));
    let service_registry = Arc::new(InProcessServiceRegistry::new());

    let catalog = ServiceCatalog::new(
        Arc::clone(&service_registry),
        Arc::clone(&configuration),
        Arc::clone(&scheduler),
    );
    catalog
        .register(record("Sine", "Southbound", 40001), "south_c")
        .await
        .unwrap();
    catalog
        .register(record("BucketStorage", "BucketStorage", 8090), "bucket_storage_c")
        .await
        .unwrap();

    let state = AppState::new(
        ScriptService::new(
            Arc::clone(&script_repo),
            Arc::clone(&acl_repo),
            Arc::clone(&configuration),
            Arc::clone(&scheduler),
        ),
        AclService::new(Arc::clone(&acl_repo), script_repo),
        ServiceAclService::new(acl_repo, configuration, scheduler),
        ProxyService::new(service_registry, Arc::new(ProxyRegistry::new())),
    );

    router::build(state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn sine_script() -> Value {
    json!({
        "name": "test",
        "steps": [
            {"write": {"order": 0, "service": "Sine", "values": {"sinusoid": "$foo$"}}},
            {"delay": {"order": 1, "duration": 9003}}
        ]
    })
}

fn test_acl() -> Value {
    json!({
        "name": "testACL",
        "service": [{"name": "IEC-104"}, {"type": "notification"}],
        "url": [{"URL": "/fledge/south/operation"}]
    })
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Automation scripts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_script_without_acl_key_when_added_without_acl() {
    let app = app().await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "GET", "/api/control/script/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "test", "steps": []}));
}

#[tokio::test]
async fn should_return_409_and_keep_original_when_adding_duplicate() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": []})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Script with name test already exists.");

    let (_, body) = call(&app, "GET", "/api/control/script", None).await;
    assert_eq!(body["scripts"].as_array().unwrap().len(), 1);
    assert_eq!(body["scripts"][0]["steps"], sine_script()["steps"]);
}

#[tokio::test]
async fn should_reject_unknown_step_kind_listing_supported_kinds() {
    let app = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": [{"a": {"order": 0}}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "a is an invalid step. Supported step types are ['configure', 'delay', 'operation', 'script', 'write'] with case-sensitive."
    );
}

#[tokio::test]
async fn should_reject_order_shared_across_step_kinds() {
    let app = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": [{"delay": {"order": 1}, "write": {"order": 1}}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "order with value 1 is also found in write. It should be unique for each step item."
    );
}

#[tokio::test]
async fn should_return_404_when_script_references_unknown_acl() {
    let app = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": [], "acl": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "ACL with name ghost is not found.");
}

#[tokio::test]
async fn should_update_only_supplied_fields() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;
    call(&app, "POST", "/api/ACL", Some(test_acl())).await;

    let (status, body) = call(
        &app,
        "PUT",
        "/api/control/script/test",
        Some(json!({"acl": "testACL"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Control script test updated successfully.");

    let (_, body) = call(&app, "GET", "/api/control/script/test", None).await;
    assert_eq!(body["acl"], "testACL");
    assert_eq!(body["steps"], sine_script()["steps"]);
}

#[tokio::test]
async fn should_return_400_when_update_payload_is_empty() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;

    let (status, body) = call(&app, "PUT", "/api/control/script/test", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Nothing to update for the given payload.");
}

#[tokio::test]
async fn should_return_404_when_deleting_missing_script() {
    let app = app().await;
    let (status, body) = call(&app, "DELETE", "/api/control/script/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "No such missing script found."}));
}

#[tokio::test]
async fn should_delete_existing_script() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;

    let (status, body) = call(&app, "DELETE", "/api/control/script/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "test script deleted successfully.");

    let (status, _) = call(&app, "GET", "/api/control/script/test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_404_naming_placeholder_without_parameter() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script/test/schedule",
        Some(json!({"parameters": {"bar": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "foo param is required by write steps of test script."
    );
}

#[tokio::test]
async fn should_schedule_once_then_reject_second_schedule() {
    let app = app().await;
    call(&app, "POST", "/api/control/script", Some(sine_script())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script/test/schedule",
        Some(json!({"parameters": {"foo": "1.5"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Schedule and configuration is created for an automation script with name test"
    );

    let (status, body) = call(&app, "POST", "/api/control/script/test/schedule", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "test schedule already exists.");
}

// ---------------------------------------------------------------------------
// ACLs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_acl_lifecycle() {
    let app = app().await;

    let (status, body) = call(&app, "POST", "/api/ACL", Some(test_acl())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, test_acl());

    let (status, body) = call(&app, "POST", "/api/ACL", Some(test_acl())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "testACL name already exists.");

    let (status, body) = call(
        &app,
        "PUT",
        "/api/ACL/testACL",
        Some(json!({"url": [{"URL": "/fledge/ping"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record updated successfully for testACL ACL");

    let (_, body) = call(&app, "GET", "/api/ACL", None).await;
    assert_eq!(body["acls"][0]["url"], json!([{"URL": "/fledge/ping"}]));
    assert_eq!(body["acls"][0]["service"], test_acl()["service"]);

    let (status, body) = call(&app, "DELETE", "/api/ACL/testACL", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "testACL ACL deleted successfully");

    let (status, _) = call(&app, "GET", "/api/ACL/testACL", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_return_409_when_deleting_acl_in_use() {
    let app = app().await;
    call(&app, "POST", "/api/ACL", Some(test_acl())).await;
    call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "test", "steps": [], "acl": "testACL"})),
    )
    .await;

    let (status, body) = call(&app, "DELETE", "/api/ACL/testACL", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "testACL ACL is in use by test script and cannot be deleted."
    );
}

#[tokio::test]
async fn should_attach_and_detach_acl_on_registered_service() {
    let app = app().await;
    call(&app, "POST", "/api/ACL", Some(test_acl())).await;

    let (status, body) = call(
        &app,
        "PUT",
        "/api/service/Sine/ACL",
        Some(json!({"acl_name": "testACL"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "testACL ACL attached to Sine service successfully");

    let (status, body) = call(
        &app,
        "PUT",
        "/api/service/Sine/ACL",
        Some(json!({"acl_name": "testACL"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A Sine service has already ACL attached");

    let (status, body) = call(&app, "DELETE", "/api/service/Sine/ACL", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ACL detached from Sine service successfully");

    let (status, body) = call(&app, "DELETE", "/api/service/Sine/ACL", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Nothing to delete as there is no ACL attached with Sine service"
    );
}

#[tokio::test]
async fn should_keep_security_category_when_script_name_collides() {
    let app = app().await;
    call(&app, "POST", "/api/ACL", Some(test_acl())).await;
    let (status, _) = call(
        &app,
        "PUT",
        "/api/service/Sine/ACL",
        Some(json!({"acl_name": "testACL"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        "POST",
        "/api/control/script",
        Some(json!({"name": "SineSecurity", "steps": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        "POST",
        "/api/control/script/SineSecurity/schedule",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "SineSecurity category already exists and cannot be used as a script run category."
    );

    let (status, body) = call(&app, "DELETE", "/api/service/Sine/ACL", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ACL detached from Sine service successfully");
}

#[tokio::test]
async fn should_reject_acl_entry_with_unknown_key() {
    let app = app().await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/ACL",
        Some(json!({
            "name": "typo",
            "service": [{"nmae": "IEC-104"}],
            "url": [{"URL": "/x"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/api/ACL/typo", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_return_404_when_attaching_unknown_acl_or_service() {
    let app = app().await;

    let (status, body) = call(
        &app,
        "PUT",
        "/api/service/Sine/ACL",
        Some(json!({"acl_name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "ghost ACL does not exist");

    let (status, body) = call(
        &app,
        "PUT",
        "/api/service/Unknown/ACL",
        Some(json!({"acl_name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Unknown service does not exist.");
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_proxy_lifecycle() {
    let app = app().await;
    let payload = json!({
        "service_name": "BucketStorage",
        "GET": {"/api/bucket/{uniqueID}": "/bucket/{uniqueID}"},
        "POST": {"/api/bucket": "/bucket"}
    });

    let (status, body) = call(&app, "POST", "/api/proxy", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Proxy has been configured for BucketStorage service.");

    let (status, body) = call(&app, "POST", "/api/proxy", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Proxy is already configured for BucketStorage service. Delete it first and then re-create."
    );

    let (status, body) = call(&app, "DELETE", "/api/proxy/BucketStorage", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Proxy operations have been stopped for BucketStorage service."
    );

    let (status, body) = call(&app, "DELETE", "/api/proxy/BucketStorage", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "For BucketStorage service, no proxy operation is configured."
    );
}

#[tokio::test]
async fn should_reject_public_path_outside_api_prefix() {
    let app = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/proxy",
        Some(json!({"service_name": "BucketStorage", "GET": {"/bucket": "/bucket"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Public URL must start with /api prefix for GET key.");
}

#[tokio::test]
async fn should_look_up_unmatched_api_path_in_proxy_routes() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/api/bucket/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No route found for GET /api/bucket/7");

    call(
        &app,
        "POST",
        "/api/proxy",
        Some(json!({
            "service_name": "BucketStorage",
            "GET": {"/api/bucket/{uniqueID}": "/bucket/{uniqueID}"}
        })),
    )
    .await;

    let (status, body) = call(&app, "GET", "/api/bucket/7", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["service"], "BucketStorage");
    assert_eq!(body["backend_path"], "/bucket/7");

    let (status, _) = call(&app, "DELETE", "/api/bucket/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
