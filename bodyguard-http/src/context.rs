//! http::Request -> Context: collect the body and parse it by content type.

use bodyguard_core::{Context, HttpError, Request};
use http_body_util::BodyExt;
use hyper::body::Body;
use serde_json::Value;
use tracing::warn;

/// Read a request into a [`Context`].
///
/// Empty body → `Value::Null`. `application/json`, `*+json` or no content type → parsed JSON.
/// `text/*` → `Value::String`. Anything else → 415.
pub async fn read_context<B>(req: http::Request<B>) -> Result<Context, HttpError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let headers: Vec<(String, String)> = parts
        .headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();
    let bytes = body
        .collect()
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to read request body");
            HttpError::bad_request(format!("could not read body: {}", e))
        })?
        .to_bytes();

    let mut request = Request::new(parts.method.as_str(), parts.uri.path());
    request.headers = headers;
    request.body = parse_body(request.header("content-type"), &bytes)?;
    Ok(Context::new(request))
}

fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value, HttpError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match essence.as_deref() {
        None | Some("application/json") => parse_json(bytes),
        Some(ct) if ct.ends_with("+json") => parse_json(bytes),
        Some(ct) if ct.starts_with("text/") => String::from_utf8(bytes.to_vec())
            .map(Value::String)
            .map_err(|_| HttpError::bad_request("body is not valid UTF-8")),
        Some(ct) => {
            warn!(content_type = ct, "unsupported request body");
            Err(HttpError::unsupported_media_type(format!(
                "unsupported content-type: {}",
                ct
            )))
        }
    }
}

fn parse_json(bytes: &[u8]) -> Result<Value, HttpError> {
    serde_json::from_slice(bytes).map_err(|e| HttpError::bad_request(format!("invalid JSON: {}", e)))
}
