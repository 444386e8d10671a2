//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection becomes `invalid_request` with `{field, code, value?}`
//! details. The extractor handlers at the bottom make malformed JSON bodies
//! and query strings use the same envelope instead of actix's plain-text
//! responses.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    OutOfRange,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::OutOfRange => "out_of_range",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
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

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<String>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "code": code.as_str(), "value": value }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// Parse a path identifier such as a course or user id.
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: FieldName) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            Some(raw.to_owned()),
        )
    })
}

/// Validate the `page`/`pageSize` query pair, defaulting missing values.
pub(crate) fn page_request(page: Option<i64>, page_size: Option<i64>) -> Result<PageRequest, Error> {
    PageRequest::from_raw(page, page_size).map_err(|err| {
        let (field, value) = match &err {
            PageRequestError::PageOutOfRange { value } => ("page", *value),
            PageRequestError::PageSizeOutOfRange { value, .. } => ("pageSize", *value),
        };
        field_error(
            FieldName::new(field),
            ErrorCode::OutOfRange,
            err.to_string(),
            Some(value.to_string()),
        )
    })
}

fn malformed(code: ErrorCode, message: String) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": code.as_str() }))
        .into()
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedBody, format!("invalid JSON body: {err}"))
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedQuery, format!("invalid query string: {err}"))
}

/// JSON extractor configuration reporting failures as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration reporting failures as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
