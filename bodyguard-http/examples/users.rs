//! Example: POST /users validated against a JSON Schema.
//!
//! ```text
//! curl -i localhost:8000/users -H 'content-type: application/json' -d '{"name":"Foo Bar"}'   # 200
//! curl -i localhost:8000/users -H 'content-type: application/json' -d '{"wrong":"Foo Bar"}'  # 400
//! ```
//! Host/port: --host/--port, or HOST/PORT from the environment.

use std::convert::Infallible;

use bodyguard_core::{validate, HttpError, JsonSchema, Validate};
use bodyguard_http::{problem_response, serve};
use bytes::Bytes;
use clap::Parser;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, Level};

async fn route(req: Request<Incoming>, post_user: Validate<JsonSchema>) -> Response<Full<Bytes>> {
    if req.method() != Method::POST || req.uri().path() != "/users" {
        let err = HttpError::new(
            StatusCode::NOT_FOUND,
            format!("{} {}", req.method(), req.uri().path()),
        );
        return problem_response(&err);
    }
    serve(req, |ctx| async move {
        let user = post_user.call(&ctx).await?;
        info!(name = %user["name"], "user created");
        Ok(json!({ "created": user }))
    })
    .await
}

/// Listen address. Flags win over HOST/PORT from the environment.
#[derive(Parser)]
#[command(name = "users", about = "bodyguard demo: POST /users")]
struct Args {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .compact()
        .init();

    let post_user = validate(JsonSchema::new(&json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "email": { "type": "string", "format": "email" }
        },
        "required": ["name"],
        "additionalProperties": false
    }))?);

    let args = Args::parse();
    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("listening on http://{}", listener.local_addr()?);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, _) = match accepted {
                    Ok(x) => x,
                    Err(e) => {
                        error!(error = %e, "accept failed");
                        continue;
                    }
                };
                let post_user = post_user.clone();
                tokio::task::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let post_user = post_user.clone();
                        async move { Ok::<_, Infallible>(route(req, post_user).await) }
                    });
                    if let Err(e) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                        error!(error = %e, "connection failed");
                    }
                });
            }
        }
    }
    info!("shutting down");
    Ok(())
}
