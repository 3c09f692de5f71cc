use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a call against the inventory store did not produce the expected value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Request failed for {endpoint}: {detail}")]
    RequestFailed {
        endpoint: String,
        detail: RequestFailure,
    },

    #[error("Validation error: {0}")]
    ValidationError(FormErrors),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl ServiceError {
    pub fn request_failed(endpoint: impl Into<String>, detail: RequestFailure) -> Self {
        ServiceError::RequestFailed {
            endpoint: endpoint.into(),
            detail,
        }
    }

    /// HTTP status reported by the store, if the failure was a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed {
                detail: RequestFailure::Status(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::ValidationError(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(FormErrors::from(err))
    }
}

impl From<FormErrors> for ServiceError {
    fn from(err: FormErrors) -> Self {
        ServiceError::ValidationError(err)
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::ExportError(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ExportError(err.to_string())
    }
}

/// Field name to human-readable reason. Only the first reason per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_insert_with(|| reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Folds another error set in, keeping reasons already recorded.
    pub fn merge(&mut self, other: FormErrors) {
        for (field, reason) in other.fields {
            self.insert(field, reason);
        }
    }

    /// `Ok(value)` when no field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reason) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, reason)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut form = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                let reason = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid {} ({})", field, first.code));
                form.insert(field, reason);
            }
        }
        form
    }
}
