use axum::{body::Body, http::StatusCode, response::Response};
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");

    serde_json::from_slice(&body).expect("Could not parse response body as JSON")
}

/// Check that `response` has the status `want_status` and a JSON body of the
/// form `{"error": want_message}`.
pub(crate) async fn assert_error_message(
    response: Response<Body>,
    want_status: StatusCode,
    want_message: &str,
) {
    assert_eq!(response.status(), want_status);
    assert_content_type(&response, "application/json");

    let body = parse_json_body(response).await;
    assert_eq!(body["error"], want_message, "Got body {body}");
}
