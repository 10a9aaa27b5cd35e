//! Render handler results as http::Response.

use bodyguard_core::HttpError;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde_json::{json, Value};

const PROBLEM_JSON: &str = "application/problem+json";
const JSON: &str = "application/json";

/// `application/problem+json` document for `err`: `{type, title, status, detail}`.
/// Server errors carry only the reason phrase; their source never reaches the client.
pub fn problem_response(err: &HttpError) -> Response<Full<Bytes>> {
    let status = err.status();
    let detail = if status.is_server_error() {
        err.title()
    } else {
        err.body()
    };
    let doc = json!({
        "type": "about:blank",
        "title": err.title(),
        "status": status.as_u16(),
        "detail": detail,
    });
    build(status, PROBLEM_JSON, doc.to_string())
}

pub fn json_response(status: StatusCode, value: &Value) -> Response<Full<Bytes>> {
    build(status, JSON, value.to_string())
}

fn build(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(body)));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}
