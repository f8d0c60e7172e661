//! Two-phase validation pipeline for the leave policy rules.
//!
//! Advisory validators back the interactive `check` endpoints that a form
//! calls while the user edits: a failure names the fields the client must
//! reset so the form cannot keep the invalid value, and individual rules
//! may be skipped for privileged actors. Mandatory validators run inside
//! the write handlers immediately before the statement is issued and are
//! never skipped.
//!
//! The validators are plain functions over plain data; the handlers fetch
//! whatever record snapshots a rule needs and pass "today" in, so nothing
//! here touches the database or the clock.

pub mod leave;
pub mod mandatory_day;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;

/// Advisory-phase failure. Maps to 422 so the client can re-prompt,
/// carrying the fields it must clear.
#[derive(Debug, Display, Error)]
#[display(fmt = "{}", message)]
pub struct AdvisoryRejection {
    pub message: String,
    pub reset_fields: Vec<&'static str>,
}

impl AdvisoryRejection {
    pub fn new(message: impl Into<String>, reset_fields: Vec<&'static str>) -> Self {
        Self {
            message: message.into(),
            reset_fields,
        }
    }
}

impl ResponseError for AdvisoryRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.message,
            "reset_fields": self.reset_fields,
        }))
    }
}

/// Mandatory-phase failure. The write is refused outright; there is no
/// field to reset because nothing was committed.
#[derive(Debug, Display, Error)]
#[display(fmt = "{}", message)]
pub struct PolicyViolation {
    pub message: String,
}

impl PolicyViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ResponseError for PolicyViolation {
    fn status_code(&self) -> StatusCode {
        StatusCode::CONFLICT
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_rejection_is_unprocessable_entity() {
        let err = AdvisoryRejection::new("bad date", vec!["date_from"]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "bad date");
    }

    #[test]
    fn policy_violation_is_conflict() {
        let err = PolicyViolation::new("denied");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "denied");
    }
}
