use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const LOGIN: &str = "/api/v1/auth/login";
pub const LOGOUT: &str = "/api/v1/auth/logout";
pub const REFRESH: &str = "/api/v1/auth/refresh";
pub const PROFILE: &str = "/api/v1/users/email/jane.doe%40example.com";

pub fn profile() -> serde_json::Value {
    json!({
        "id": "u-42",
        "name": "Jane Doe",
        "email": "jane.doe@example.com",
        "isAdministrator": false,
        "accountDeactivated": false,
    })
}

/// Auth backend accepting password `secret`.
/// The profile endpoint answers with profile_status.
pub async fn backend(profile_status: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN))
        .and(body_partial_json(json!({"password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "a1", "refreshToken": "r1"})),
        )
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"access_token": "a2", "refresh_token": "r2", "expires_in": 3600}),
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGOUT))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let profile_response = if profile_status == 200 {
        ResponseTemplate::new(200).set_body_json(profile())
    } else {
        ResponseTemplate::new(profile_status).set_body_json(json!({"error": "denied"}))
    };
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(profile_response)
        .mount(&server)
        .await;

    server
}

pub async fn requests_to(server: &MockServer, endpoint: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == endpoint)
        .collect()
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}
