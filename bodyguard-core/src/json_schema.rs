//! JSON Schema validator backed by the `jsonschema` crate.

use std::marker::PhantomData;

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::issue::{Invalid, Issue};
use crate::validator::Validator;
use crate::{BoxError, ParseError};

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid schema: {0}")]
    Compile(#[source] BoxError),
}

/// Compiled JSON Schema. Output is the input as `Value`, or `T` via serde once the schema accepts it.
pub struct JsonSchema<T = Value> {
    compiled: jsonschema::Validator,
    _output: PhantomData<fn() -> T>,
}

impl JsonSchema<Value> {
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        Self::compile(schema)
    }
}

impl<T> JsonSchema<T> {
    /// Compile `schema` for a typed output. Draft is detected from `$schema`.
    pub fn compile(schema: &Value) -> Result<Self, SchemaError> {
        let compiled =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(Box::new(e)))?;
        Ok(Self {
            compiled,
            _output: PhantomData,
        })
    }

    /// Every schema violation in `input`, in the order the schema reports them.
    pub fn issues(&self, input: &Value) -> Vec<Issue> {
        self.compiled.iter_errors(input).map(to_issue).collect()
    }
}

impl<T> Validator for JsonSchema<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    fn parse(&self, input: &Value) -> Result<T, ParseError> {
        if let Some(invalid) = Invalid::new(self.issues(input)) {
            return Err(invalid.into());
        }
        serde_json::from_value(input.clone()).map_err(|e| {
            Invalid::single(Issue::form("invalid_type", e.to_string())).into()
        })
    }
}

fn to_issue(err: ValidationError<'_>) -> Issue {
    let mut path = pointer_segments(&err.instance_path.to_string());
    let code = match &err.kind {
        ValidationErrorKind::Required { property } => {
            // Reported on the parent object; pin it to the missing key instead.
            path.push(
                property
                    .as_str()
                    .map(str::to_owned)
                    .unwrap_or_else(|| property.to_string()),
            );
            return Issue::new(path, "required", "Required");
        }
        ValidationErrorKind::Type { .. } => "invalid_type",
        ValidationErrorKind::AdditionalProperties { .. } => "unrecognized_keys",
        ValidationErrorKind::Enum { .. } => "invalid_enum_value",
        ValidationErrorKind::MinLength { .. }
        | ValidationErrorKind::MinItems { .. }
        | ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. } => "too_small",
        ValidationErrorKind::MaxLength { .. }
        | ValidationErrorKind::MaxItems { .. }
        | ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. } => "too_big",
        ValidationErrorKind::Pattern { .. } | ValidationErrorKind::Format { .. } => {
            "invalid_string"
        }
        _ => "custom",
    };
    Issue::new(path, code, err.to_string())
}

/// Split a JSON pointer (`/address/zip`) into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "age": { "type": "integer", "minimum": 0 },
                "address": {
                    "type": "object",
                    "properties": { "zip": { "type": "string" } },
                    "required": ["zip"]
                }
            },
            "required": ["name"]
        })
    }

    #[test]
    fn pointer_segments_unescape() {
        assert!(pointer_segments("").is_empty());
        assert_eq!(pointer_segments("/a/0/b"), vec!["a", "0", "b"]);
        assert_eq!(pointer_segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
    }

    #[test]
    fn missing_property_is_pinned_to_its_key() {
        let schema = JsonSchema::new(&user_schema()).unwrap();
        let issues = schema.issues(&json!({ "wrong": "Foo Bar" }));
        assert_eq!(issues, vec![Issue::new(vec!["name".into()], "required", "Required")]);
    }

    #[test]
    fn nested_paths_and_codes() {
        let schema = JsonSchema::new(&user_schema()).unwrap();
        let issues = schema.issues(&json!({ "name": "", "age": "old", "address": {} }));
        let mut seen: Vec<(String, String)> = issues
            .iter()
            .map(|i| (i.dotted_path(), i.code.clone()))
            .collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("address.zip".to_string(), "required".to_string()),
                ("age".to_string(), "invalid_type".to_string()),
                ("name".to_string(), "too_small".to_string()),
            ]
        );
    }

    #[test]
    fn root_type_mismatch_is_form_level() {
        let schema = JsonSchema::new(&user_schema()).unwrap();
        let issues = schema.issues(&json!(["not", "an", "object"]));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_empty());
        assert_eq!(issues[0].code, "invalid_type");
    }

    #[test]
    fn broken_schema_fails_to_compile() {
        let err = JsonSchema::new(&json!({ "type": 12 })).err().unwrap();
        assert!(matches!(err, SchemaError::Compile(_)));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(err.to_string(), format!("invalid schema: {}", source));
    }

    #[test]
    fn typed_output() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct User {
            name: String,
        }
        let schema = JsonSchema::<User>::compile(&user_schema()).unwrap();
        let user = schema.parse(&json!({ "name": "Foo Bar" })).unwrap();
        assert_eq!(user, User { name: "Foo Bar".into() });
    }

    #[test]
    fn schema_and_type_disagreeing_is_form_level() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Strict {
            name: String,
            nickname: String,
        }
        let schema = JsonSchema::<Strict>::compile(&user_schema()).unwrap();
        match schema.parse(&json!({ "name": "Foo Bar" })) {
            Err(ParseError::Invalid(invalid)) => {
                let flat = invalid.flatten();
                assert!(flat.field_errors.is_empty());
                assert_eq!(flat.form_errors.len(), 1);
            }
            other => panic!("expected Invalid, got {:?}", other.map(|_| ())),
        }
    }
}
