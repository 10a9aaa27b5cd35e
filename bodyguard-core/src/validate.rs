//! Validating adapter: bind a validator once, call it per request.

use std::sync::Arc;

use tracing::{debug, error};

use crate::context::RequestBody;
use crate::http_error::HttpError;
use crate::issue::Invalid;
use crate::validator::Validator;
use crate::ParseError;

/// Validation function for handlers. Holds only the bound validator, so one instance
/// can serve any number of concurrent requests.
pub struct Validate<V> {
    validator: Arc<V>,
}

impl<V> Clone for Validate<V> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}

/// Creates a validation function for request handlers.
///
/// ```ignore
/// // validation.rs
/// pub fn post_user() -> Validate<JsonSchema> { validate(JsonSchema::new(&USER_SCHEMA).unwrap()) }
///
/// // handler:
/// let body = post_user.call(&ctx).await?;
/// ```
///
/// Rejected bodies fail with a 400 [`HttpError`] whose body is the flattened issues as JSON.
/// Validator failures that are not schema violations fail with a 500 whose source is the cause.
pub fn validate<V: Validator>(validator: V) -> Validate<V> {
    Validate {
        validator: Arc::new(validator),
    }
}

impl<V: Validator> Validate<V> {
    /// Validate the body of `ctx`. The context is not modified.
    pub async fn call<C>(&self, ctx: &C) -> Result<V::Output, HttpError>
    where
        C: RequestBody + Sync + ?Sized,
    {
        match self.validator.parse_async(ctx.body()).await {
            Ok(value) => Ok(value),
            Err(ParseError::Invalid(invalid)) => {
                debug!(issues = invalid.issues().len(), "request body rejected");
                Err(bad_request(&invalid))
            }
            Err(ParseError::Other(cause)) => {
                error!(error = %cause, "validator failed unexpectedly");
                Err(HttpError::internal(cause))
            }
        }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }
}

fn bad_request(invalid: &Invalid) -> HttpError {
    match serde_json::to_string(&invalid.flatten()) {
        Ok(body) => HttpError::bad_request(body),
        Err(e) => HttpError::internal(e),
    }
}
