//! Bodyguard core: validate request bodies, reject bad ones with HTTP 400.
//!
//! ```ignore
//! use bodyguard_core::{validate, JsonSchema};
//! use serde_json::json;
//!
//! let post = validate(JsonSchema::new(&json!({
//!     "type": "object",
//!     "properties": { "name": { "type": "string" } },
//!     "required": ["name"]
//! }))?);
//!
//! // in a handler:
//! let body = post.call(&ctx).await?;
//! ```

pub mod context;
pub mod http_error;
pub mod issue;
pub mod json_schema;
pub mod rules;
pub mod validate;
pub mod validator;

pub use context::{Context, Request, RequestBody};
pub use http_error::HttpError;
pub use issue::{Flattened, Invalid, Issue};
pub use json_schema::{JsonSchema, SchemaError};
pub use rules::Rules;
pub use validate::{validate, Validate};
pub use self::validator::Validator;

use thiserror::Error;

/// Boxed cause of an unexpected validator failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a validator did not produce a value.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input does not conform to the schema.
    #[error(transparent)]
    Invalid(#[from] Invalid),
    /// Anything else: a broken validator, a failed lookup inside an async rule, etc.
    #[error("validator failed: {0}")]
    Other(BoxError),
}

impl ParseError {
    pub fn other<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ParseError::Other(err.into())
    }
}
