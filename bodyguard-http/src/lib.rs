//! Bodyguard for hyper/http: Context from http::Request, HttpError as problem+json.

pub mod context;
pub mod response;

pub use context::read_context;
pub use response::{json_response, problem_response};

use std::future::Future;

use bodyguard_core::{Context, HttpError};
use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Body;
use serde_json::Value;
use tracing::debug;

/// Error-handling wrapper for one request: read the context, run `handler`,
/// render `Ok` as 200 JSON and `Err(HttpError)` as a problem document.
///
/// ```ignore
/// let post_user = validate(Rules::<NewUser>::new());
/// let service = service_fn(move |req| {
///     let post_user = post_user.clone();
///     async move {
///         Ok::<_, Infallible>(serve(req, |ctx| async move {
///             let user = post_user.call(&ctx).await?;
///             Ok(json!({ "created": user.name }))
///         }).await)
///     }
/// });
/// ```
pub async fn serve<B, F, Fut>(req: http::Request<B>, handler: F) -> http::Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
    F: FnOnce(Context) -> Fut,
    Fut: Future<Output = Result<Value, HttpError>>,
{
    let ctx = match read_context(req).await {
        Ok(ctx) => ctx,
        Err(e) => return problem_response(&e),
    };
    let method = ctx.request.method.clone();
    let path = ctx.request.path.clone();
    match handler(ctx).await {
        Ok(value) => json_response(StatusCode::OK, &value),
        Err(e) => {
            debug!(%method, %path, status = e.status().as_u16(), "request failed");
            problem_response(&e)
        }
    }
}
