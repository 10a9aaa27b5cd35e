//! Structured validation failure and its flattened, client-facing shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One problem with the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Object keys and array indices from the root. Empty for whole-body problems.
    pub path: Vec<String>,
    /// Machine-readable kind, e.g. `required`, `invalid_type`.
    pub code: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: Vec<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Issue about the body as a whole.
    pub fn form(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Vec::new(), code, message)
    }

    /// Dotted path, e.g. `address.zip` or `items.0`. Empty for form-level issues.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Input did not conform to the schema. Never empty.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("invalid input: {}", summary(.issues))]
pub struct Invalid {
    issues: Vec<Issue>,
}

fn summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| {
            if i.path.is_empty() {
                i.message.clone()
            } else {
                format!("{}: {}", i.dotted_path(), i.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl Invalid {
    /// `None` if `issues` is empty: no issues means the input was valid.
    pub fn new(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Group messages by first path segment; path-less issues become form errors.
    pub fn flatten(&self) -> Flattened {
        self.flatten_with(|issue| issue.message.clone())
    }

    /// Like [`flatten`](Self::flatten), storing `mapper(issue)` instead of the message.
    pub fn flatten_with<F>(&self, mut mapper: F) -> Flattened
    where
        F: FnMut(&Issue) -> String,
    {
        let mut flat = Flattened::default();
        for issue in &self.issues {
            let mapped = mapper(issue);
            match issue.path.first() {
                Some(field) => flat.field_errors.entry(field.clone()).or_default().push(mapped),
                None => flat.form_errors.push(mapped),
            }
        }
        flat
    }
}

/// `{ "formErrors": [...], "fieldErrors": { "name": [...] } }`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flattened {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}
