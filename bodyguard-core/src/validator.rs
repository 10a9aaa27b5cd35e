//! Validator capability: parse an untyped value into a typed one, or explain why not.

use async_trait::async_trait;
use serde_json::Value;

use crate::ParseError;

/// Parses request bodies. Implementations report schema violations as
/// [`ParseError::Invalid`] and everything else as [`ParseError::Other`].
#[async_trait]
pub trait Validator: Send + Sync {
    type Output: Send;

    fn parse(&self, input: &Value) -> Result<Self::Output, ParseError>;

    /// Override when a rule needs to await something (a lookup, a remote check).
    async fn parse_async(&self, input: &Value) -> Result<Self::Output, ParseError> {
        self.parse(input)
    }
}
