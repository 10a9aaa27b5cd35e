//! HTTP-status-bearing error. Handlers return it; error middleware renders it.

use http::StatusCode;
use thiserror::Error;

use crate::BoxError;

/// Client or server error with an HTTP status and a string body.
///
/// For validation failures the body is the JSON-encoded [`Flattened`](crate::Flattened) issues.
#[derive(Error, Debug)]
#[error("[{}] {}: {}", .status.as_u16(), reason(.status), .body)]
pub struct HttpError {
    status: StatusCode,
    body: String,
    #[source]
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            source: None,
        }
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    pub fn unsupported_media_type(body: impl Into<String>) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, body)
    }

    /// 500 with the generic reason phrase as body. The cause is kept as `source()` only.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: reason(&StatusCode::INTERNAL_SERVER_ERROR).to_owned(),
            source: Some(cause.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Canonical reason phrase, e.g. "Bad Request".
    pub fn title(&self) -> &'static str {
        reason(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// True if `err` is an `HttpError`.
    pub fn is_http_error(err: &(dyn std::error::Error + 'static)) -> bool {
        err.downcast_ref::<HttpError>().is_some()
    }

    /// First `HttpError` in the source chain of `err`, including `err` itself.
    pub fn find<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a HttpError> {
        let mut cur = Some(err);
        while let Some(e) = cur {
            if let Some(found) = e.downcast_ref::<HttpError>() {
                return Some(found);
            }
            cur = e.source();
        }
        None
    }
}

fn reason(status: &StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn bad_request_carries_body() {
        let err = HttpError::bad_request("{\"formErrors\":[]}");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.title(), "Bad Request");
        assert_eq!(err.body(), "{\"formErrors\":[]}");
        assert!(err.is_client_error());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "[400] Bad Request: {\"formErrors\":[]}");
    }

    #[test]
    fn internal_hides_cause_in_body() {
        let err = HttpError::internal("db connection refused");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), "Internal Server Error");
        assert_eq!(err.source().unwrap().to_string(), "db connection refused");
        assert_eq!(err.to_string(), "[500] Internal Server Error: Internal Server Error");
    }

    #[test]
    fn recognized_behind_dyn_error() {
        let err = HttpError::bad_request("x");
        let dyn_err: &(dyn Error + 'static) = &err;
        assert!(HttpError::is_http_error(dyn_err));
        let io = std::io::Error::new(std::io::ErrorKind::Other, "nope");
        assert!(!HttpError::is_http_error(&io));
    }

    #[test]
    fn find_walks_source_chain() {
        #[derive(Debug)]
        struct Wrapper(HttpError);
        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "handler failed")
            }
        }
        impl Error for Wrapper {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let wrapped = Wrapper(HttpError::bad_request("x"));
        let found = HttpError::find(&wrapped).unwrap();
        assert_eq!(found.status(), StatusCode::BAD_REQUEST);
    }
}
