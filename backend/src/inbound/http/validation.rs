//! Shared validation helpers for inbound HTTP adapters.
//!
//! Client-facing messages stay in Portuguese; the `details` object carries
//! the offending field and a stable code for programmatic handling.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::schedule::parse_time_of_day;
use crate::domain::{AppointmentStatus, Error};

pub(crate) const INVALID_ID: &str = "ID inválido";
pub(crate) const INVALID_DATE: &str = "Data inválida";
pub(crate) const INVALID_TIME: &str = "Horário inválido";
pub(crate) const INVALID_STATUS: &str = "Status inválido";
pub(crate) const INVALID_BODY: &str = "Corpo da requisição inválido";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidTime,
    InvalidStatus,
    InvalidBody,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidDate => "invalid_date",
            Self::InvalidTime => "invalid_time",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": ValidationCode::MissingField.as_str(),
    }))
}

fn invalid_value_error(field: FieldName, message: &str, code: ValidationCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Request bodies built by JavaScript clients send ids as numbers or
/// numeric strings; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IdInput {
    /// `"barber_id": 3`
    Number(i64),
    /// `"barber_id": "3"`
    Text(String),
}

impl IdInput {
    fn raw(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

/// Parse a positive integer id from a path or query segment.
pub(crate) fn parse_id(raw: &str, field: FieldName, message: &str) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_value_error(field, message, ValidationCode::InvalidId, raw))
}

/// Parse a positive integer id from a JSON body field.
pub(crate) fn parse_id_input(input: &IdInput, field: FieldName, message: &str) -> Result<i32, Error> {
    match input {
        IdInput::Number(value) => i32::try_from(*value)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                invalid_value_error(field, message, ValidationCode::InvalidId, &input.raw())
            }),
        IdInput::Text(value) => parse_id(value, field, message),
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_value_error(field, INVALID_DATE, ValidationCode::InvalidDate, raw))
}

/// Parse an `HH:MM` or `HH:MM:SS` time of day.
pub(crate) fn parse_time(raw: &str, field: FieldName) -> Result<NaiveTime, Error> {
    parse_time_of_day(raw)
        .ok_or_else(|| invalid_value_error(field, INVALID_TIME, ValidationCode::InvalidTime, raw))
}

/// Parse an appointment status filter.
pub(crate) fn parse_status(raw: &str, field: FieldName) -> Result<AppointmentStatus, Error> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_value_error(field, INVALID_STATUS, ValidationCode::InvalidStatus, raw))
}

/// Body or query payload that failed to deserialise.
pub(crate) fn invalid_body_error(reason: &str) -> Error {
    Error::invalid_request(INVALID_BODY).with_details(json!({
        "reason": reason,
        "code": ValidationCode::InvalidBody.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("id");

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("99999999999", None)]
    fn path_ids_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_id(raw, FIELD, INVALID_ID).ok(), expected);
    }

    #[rstest]
    #[case(IdInput::Number(4), Some(4))]
    #[case(IdInput::Text("5".to_owned()), Some(5))]
    #[case(IdInput::Number(0), None)]
    #[case(IdInput::Number(i64::from(i32::MAX) + 1), None)]
    #[case(IdInput::Text("x".to_owned()), None)]
    fn body_ids_accept_numbers_and_numeric_strings(
        #[case] input: IdInput,
        #[case] expected: Option<i32>,
    ) {
        assert_eq!(parse_id_input(&input, FIELD, "IDs inválidos").ok(), expected);
    }

    #[rstest]
    fn id_errors_report_field_and_value() {
        let err = parse_id("abc", FieldName::new("barberId"), "ID de barbeiro inválido")
            .expect_err("non-numeric id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "ID de barbeiro inválido");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "barberId", "value": "abc", "code": "invalid_id"}))
        );
    }

    #[rstest]
    fn ids_deserialise_from_either_json_shape() {
        let parsed: Vec<IdInput> = serde_json::from_str(r#"[1, "2"]"#).expect("valid JSON");
        assert_eq!(parsed, vec![IdInput::Number(1), IdInput::Text("2".to_owned())]);
    }

    #[rstest]
    #[case("2025-06-10", true)]
    #[case("2025-02-30", false)]
    #[case("10/06/2025", false)]
    fn dates_use_iso_format(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw, FieldName::new("date")).is_ok(), ok);
    }

    #[rstest]
    #[case("10:30", true)]
    #[case("10:30:00", true)]
    #[case("ten", false)]
    fn times_accept_minutes_or_seconds(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_time(raw, FieldName::new("appointment_time")).is_ok(), ok);
    }

    #[rstest]
    fn statuses_parse_storage_values() {
        let field = FieldName::new("status");
        assert_eq!(parse_status("completed", field).ok(), Some(AppointmentStatus::Completed));
        assert_eq!(
            parse_status("done", field).map_err(|err| err.message().to_owned()),
            Err(INVALID_STATUS.to_owned())
        );
    }
}
