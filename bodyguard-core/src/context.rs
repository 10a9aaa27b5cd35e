//! Request context handed to validators. Owned by the host framework; bodyguard only reads the body.

use serde_json::Value;

/// Anything that carries a request body. Implement this for your framework's context type.
pub trait RequestBody {
    fn body(&self) -> &Value;
}

/// Request as seen by handlers: method, path, headers and the already-parsed body.
#[derive(Clone, Debug, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// Parsed body. `Value::Null` when the request had none.
    pub body: Value,
}

impl Request {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_owned(),
            headers: Vec::new(),
            body: Value::Null,
        }
    }

    /// First header value with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Per-request context.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub request: Request,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self { request }
    }

    /// Shortcut for tests and in-process calls: a request with the given body.
    pub fn with_body(method: &str, path: &str, body: Value) -> Self {
        let mut request = Request::new(method, path);
        request.body = body;
        Self { request }
    }
}

impl RequestBody for Context {
    fn body(&self) -> &Value {
        &self.request.body
    }
}

impl RequestBody for Request {
    fn body(&self) -> &Value {
        &self.body
    }
}

impl RequestBody for Value {
    fn body(&self) -> &Value {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let mut req = Request::new("post", "/users");
        req.headers.push(("Content-Type".into(), "application/json".into()));
        assert_eq!(req.method, "POST");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn body_defaults_to_null() {
        let ctx = Context::new(Request::new("GET", "/"));
        assert_eq!(ctx.body(), &Value::Null);
        let ctx = Context::with_body("POST", "/", json!({ "a": 1 }));
        assert_eq!(ctx.body(), &json!({ "a": 1 }));
    }

    #[test]
    fn request_and_bare_value_carry_a_body() {
        let mut req = Request::new("PUT", "/users/1");
        req.body = json!({ "name": "Foo Bar" });
        assert_eq!(RequestBody::body(&req), &json!({ "name": "Foo Bar" }));

        let raw = json!([1, 2, 3]);
        assert_eq!(RequestBody::body(&raw), &json!([1, 2, 3]));
    }
}
