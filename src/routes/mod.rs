//! The request handlers of the REST API, grouped by feature, plus the shared
//! JSON response envelope.

pub mod category;
pub mod log_in;
pub mod register;
pub mod summary;
pub mod transaction;

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::Error;

/// The JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A human readable description of what went wrong.
    pub message: String,
}

/// The JSON body of a successful response.
///
/// `data` is omitted entirely, rather than sent as `null`, for responses
/// without a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    /// A human readable description of the outcome.
    pub message: String,
    /// The payload, if the operation produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Build a success envelope response with `status`.
///
/// If the body itself cannot be serialized the response degrades to a 400
/// error envelope instead of failing the connection.
pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: Option<T>,
) -> Response {
    let body = SuccessResponse {
        message: message.to_owned(),
        data,
    };

    match serde_json::to_string(&body) {
        Ok(text) => (status, [(CONTENT_TYPE, "application/json")], text).into_response(),
        Err(error) => Error::JSONSerializationError(error.to_string()).into_response(),
    }
}

/// The error used when a request body could not be parsed as the expected JSON.
pub(crate) fn invalid_json() -> Error {
    Error::Validation("invalid json format".to_owned())
}

/// Parse a `YYYY-MM-DD` query parameter.
pub(crate) fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::Validation("invalid date format, expected YYYY-MM-DD".to_owned()))
}
