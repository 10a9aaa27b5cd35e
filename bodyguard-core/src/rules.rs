//! Validator for types deriving `validator::Validate`: deserialize with serde, then run the rules.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::issue::{Invalid, Issue};
use crate::validator::Validator;
use crate::ParseError;

/// Key `validator` uses for struct-level (`#[validate(schema(..))]`) errors.
const STRUCT_LEVEL: &str = "__all__";

/// `Rules::<CreateUser>::new()` parses bodies into `CreateUser` and checks its `#[validate]` rules.
pub struct Rules<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> Rules<T> {
    pub fn new() -> Self {
        Self {
            _output: PhantomData,
        }
    }
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Validator for Rules<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Output = T;

    fn parse(&self, input: &Value) -> Result<T, ParseError> {
        let value: T = serde_path_to_error::deserialize(input)
            .map_err(|e| Invalid::single(deserialize_issue(&e)))?;
        if let Err(errors) = value.validate() {
            let mut issues = Vec::new();
            collect(&errors, &[], &mut issues);
            return Err(match Invalid::new(issues) {
                Some(invalid) => invalid.into(),
                None => ParseError::other("validation failed without details"),
            });
        }
        Ok(value)
    }
}

/// Serde stops at the first error. A missing field is reported on its parent struct;
/// pin it to the field itself, like any other required-property failure.
fn deserialize_issue(err: &serde_path_to_error::Error<serde_json::Error>) -> Issue {
    let mut path: Vec<String> = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            _ => None,
        })
        .collect();
    let message = err.inner().to_string();
    match missing_field(&message) {
        Some(field) => {
            path.push(field.to_owned());
            Issue::new(path, "required", "Required")
        }
        None => Issue::new(path, "invalid_type", message),
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.strip_suffix('`')
}

fn collect(errors: &ValidationErrors, prefix: &[String], out: &mut Vec<Issue>) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (field, kind) in entries {
        let mut path = prefix.to_vec();
        if field != STRUCT_LEVEL {
            path.push(field.to_string());
        }
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| Issue::new(path.clone(), e.code.to_string(), message(e))));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let mut item_path = path.clone();
                    item_path.push(index.to_string());
                    collect(inner, &item_path, out);
                }
            }
        }
    }
}

fn message(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}
