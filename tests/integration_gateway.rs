mod common;

use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string, body_string_contains, header, header_exists, method, path,
};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use common::*;
use taskdeck_client::error::ClientError;
use taskdeck_client::models::session::Credentials;

/// Matches any multipart form submission by its content type.
struct MultipartForm;

impl wiremock::Match for MultipartForm {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data; boundary="))
    }
}

fn persist_fresh_session(session: &taskdeck_client::session::store::SessionStore) -> String {
    let token = fresh_token();
    let credentials = Credentials {
        access_token: token.clone(),
        refresh_token: Some("refresh-token".to_string()),
        user: serde_json::from_value(user_json()).unwrap(),
    };
    session.persist(&credentials, false).unwrap();
    token
}

#[tokio::test]
async fn bearer_token_is_attached_when_signed_in() {
    let server = MockServer::start().await;
    let (gateway, session) = test_gateway(&server.uri());
    let token = persist_fresh_session(&session);

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway.send(Method::GET, "/api/tasks/", None, None).await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn no_authorization_header_when_signed_out() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    // Any request that does carry an Authorization header hits this mock and
    // fails the assertion below.
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let body = gateway.send(Method::GET, "/api/tasks/", None, None).await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn get_requests_never_carry_a_body() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(body_string(String::new()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // A body is passed but must be dropped for GET.
    let result = gateway
        .send(Method::GET, "/api/tasks/", Some(&json!({ "filter": "all" })), None)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn post_body_is_serialized_when_provided() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .and(body_json(json!({ "title": "Write tests" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway
        .send(
            Method::POST,
            "/api/tasks/",
            Some(&json!({ "title": "Write tests" })),
            None,
        )
        .await
        .unwrap();
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error_and_caller_clears_session() {
    let server = MockServer::start().await;
    let (gateway, session) = test_gateway(&server.uri());
    persist_fresh_session(&session);

    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Token is invalid or expired" })),
        )
        .mount(&server)
        .await;

    let err = gateway
        .send(Method::GET, "/api/users/me/", None, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("Token is invalid or expired"));
    assert_eq!(
        err.data(),
        Some(&json!({ "detail": "Token is invalid or expired" }))
    );

    // The caller-side policy for a 401 on a protected call.
    session.clear();
    assert!(!session.current_session().is_authenticated);
}

#[tokio::test]
async fn conflict_maps_to_conflict_error_with_the_parsed_body() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    let error_body = json!({ "detail": "Email already in use", "fields": { "email": "taken" } });
    Mock::given(method("POST"))
        .and(path("/api/users/register/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = gateway
        .send(Method::POST, "/api/users/register/", Some(&json!({})), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Conflict { .. }));
    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("Email already in use"));
    // Field-level detail rides along for the caller to act on.
    assert_eq!(err.data(), Some(&error_body));
}

#[tokio::test]
async fn error_body_is_parsed_into_message_and_data() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    let error_body = json!({ "detail": "Invalid payload", "fields": { "title": "required" } });
    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = gateway
        .send(Method::POST, "/api/tasks/", Some(&json!({})), None)
        .await
        .unwrap_err();

    match err {
        ClientError::Api { message, status, data } => {
            assert_eq!(message, "Invalid payload");
            assert_eq!(status, 400);
            assert_eq!(data, Some(error_body));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_the_status_line() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway.send(Method::GET, "/api/tasks/", None, None).await.unwrap_err();
    match err {
        ClientError::Api { message, status, data } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
            assert_eq!(data, None);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn multipart_upload_carries_the_bearer_and_form_content_type() {
    let server = MockServer::start().await;
    let (gateway, session) = test_gateway(&server.uri());
    let token = persist_fresh_session(&session);

    let asset_id = "9d1f7c40-2b3e-4f6a-8a21-0c5d4e9b7f33";
    let task_id = uuid::Uuid::parse_str("1c9a6e12-5d4b-4f7e-9b30-2a8c7d6e5f44").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/assets/"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .and(MultipartForm)
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("meeting notes"))
        .and(body_string_contains("name=\"task\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": asset_id,
            "file_name": "notes.txt",
            "url": format!("/media/assets/{}/notes.txt", asset_id),
            "task": task_id,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = taskdeck_client::api::assets::upload(
        &gateway,
        "notes.txt",
        b"meeting notes".to_vec(),
        "text/plain",
        Some(task_id),
    )
    .await
    .unwrap();

    assert_eq!(asset.id.to_string(), asset_id);
    assert_eq!(asset.file_name, "notes.txt");
    assert_eq!(asset.task, Some(task_id));
}

#[tokio::test]
async fn network_failure_carries_no_status() {
    // Nothing listens here; the connection is refused.
    let (gateway, _session) = test_gateway("http://127.0.0.1:9");

    let err = gateway.send(Method::GET, "/api/tasks/", None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.status(), None);
    assert!(err.data().is_none());
}

#[tokio::test]
async fn empty_success_body_resolves_to_null() {
    let server = MockServer::start().await;
    let (gateway, _session) = test_gateway(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/api/tasks/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = gateway.send(Method::DELETE, "/api/tasks/7/", None, None).await.unwrap();
    assert_eq!(body, serde_json::Value::Null);
}
