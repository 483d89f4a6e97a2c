use std::{error::Error as StdError, fmt};

use backtrace::Backtrace;
use http::StatusCode;
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Structured failure carried through the request pipeline and rendered as
/// the single error body shape of the service.
///
/// Only the status code and the message are stored. The status text is
/// looked up from the code whenever the record is serialized, so the two can
/// never disagree.
pub struct FailureRecord {
    code: u16,
    message: String,
    backtrace: Backtrace,
}

impl FailureRecord {
    pub fn new<S: ToString + ?Sized>(code: u16, message: &S) -> Self {
        Self {
            code,
            message: message.to_string(),
            backtrace: Backtrace::new_unresolved(),
        }
    }

    /// HTTP status of the record. Codes outside the HTTP range collapse to
    /// `500 Internal Server Error`.
    pub fn status(&self) -> StatusCode {
        match StatusCode::from_u16(self.code) {
            Ok(status) if status.canonical_reason().is_some() => status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_text(&self) -> &'static str {
        self.status().canonical_reason().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for FailureRecord {
    fn from(err: anyhow::Error) -> Self {
        anyhow(err)
    }
}

impl fmt::Debug for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut backtrace = self.backtrace.clone();
        backtrace.resolve();
        f.debug_struct("FailureRecord")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("backtrace", &backtrace)
            .finish()
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status().as_u16(), self.status_text(), self.message)
    }
}

impl StdError for FailureRecord {}

impl PartialEq for FailureRecord {
    fn eq(&self, other: &Self) -> bool {
        self.status() == other.status() && self.message == other.message
    }
}

impl Serialize for FailureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let status = self.status();
        let mut state = serializer.serialize_struct("FailureRecord", 3)?;
        state.serialize_field("StatusCode", &status.as_u16())?;
        state.serialize_field(
            "StatusMessage",
            status.canonical_reason().unwrap_or_default(),
        )?;
        state.serialize_field("ErrorMessage", &self.message)?;
        state.end()
    }
}

#[inline]
pub fn anyhow(err: anyhow::Error) -> FailureRecord {
    internal(&format!("{err:#}"))
}

#[inline]
pub fn internal<S: ToString + ?Sized>(err: &S) -> FailureRecord {
    FailureRecord::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), err)
}

#[inline]
pub fn bad_request<S: ToString + ?Sized>(err: &S) -> FailureRecord {
    FailureRecord::new(StatusCode::BAD_REQUEST.as_u16(), err)
}

#[inline]
pub fn not_found<S: ToString + ?Sized>(err: &S) -> FailureRecord {
    FailureRecord::new(StatusCode::NOT_FOUND.as_u16(), err)
}

#[inline]
pub fn method_not_allowed<S: ToString + ?Sized>(err: &S) -> FailureRecord {
    FailureRecord::new(StatusCode::METHOD_NOT_ALLOWED.as_u16(), err)
}

#[cfg(feature = "axum-resp")]
mod axum {
    use axum::response::IntoResponse;

    impl IntoResponse for super::FailureRecord {
        fn into_response(self) -> axum::response::Response {
            (self.status(), axum::Json(self)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_text_follows_code() {
        let record = not_found("Resource not found");
        assert_eq!(record.status(), StatusCode::NOT_FOUND);
        assert_eq!(record.status_text(), "Not Found");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "StatusCode": 404,
                "StatusMessage": "Not Found",
                "ErrorMessage": "Resource not found",
            })
        );
    }

    #[test]
    fn unknown_code_renders_as_internal() {
        let record = FailureRecord::new(799, "odd");
        assert_eq!(record.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["StatusCode"], 500);
        assert_eq!(value["StatusMessage"], "Internal Server Error");
        assert_eq!(value["ErrorMessage"], "odd");
    }

    #[test]
    fn anyhow_errors_are_internal() {
        let record: FailureRecord =
            anyhow::anyhow!("engine unreachable").into();
        assert_eq!(record.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(record.message(), "engine unreachable");
    }

    #[test]
    fn equality_ignores_backtrace() {
        assert_eq!(bad_request("x"), bad_request("x"));
        assert_ne!(bad_request("x"), internal("x"));
    }

    #[test]
    fn display_includes_status_line() {
        let record = method_not_allowed("Use POST requests");
        assert_eq!(record.to_string(), "405 Method Not Allowed: Use POST requests");
    }
}
