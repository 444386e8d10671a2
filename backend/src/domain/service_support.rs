//! Conversions from domain validation failures into API errors.
//!
//! Field failures become `invalid_request` with `{field, code, value?}`
//! details so clients can highlight the offending input.

use serde_json::json;

use super::{
    ContentValidationError, CourseValidationError, Error, FilterError, LoginValidationError,
    UserValidationError,
};

fn required_field(field: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": "required",
    }))
}

impl From<CourseValidationError> for Error {
    fn from(err: CourseValidationError) -> Self {
        required_field(err.field(), err.to_string())
    }
}

impl From<ContentValidationError> for Error {
    fn from(err: ContentValidationError) -> Self {
        required_field(err.field(), err.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        required_field(err.field(), err.to_string())
    }
}

impl From<LoginValidationError> for Error {
    fn from(err: LoginValidationError) -> Self {
        required_field(err.field(), err.to_string())
    }
}

impl From<FilterError> for Error {
    fn from(err: FilterError) -> Self {
        let message = err.to_string();
        match err {
            FilterError::InvalidDate { key, value } => Self::invalid_request(message)
                .with_details(json!({
                    "field": key,
                    "code": "invalid_date",
                    "value": value,
                })),
        }
    }
}
