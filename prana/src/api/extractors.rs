use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::PranaError;

/// `axum::Json` whose rejections render as v1 `invalid_request` errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PranaError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for PranaError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> PranaError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                PranaError::Validation(format!("Missing required field: {field}"))
            } else {
                PranaError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            PranaError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            PranaError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            PranaError::Internal("Failed to read request body".to_string())
        }
        _ => PranaError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
