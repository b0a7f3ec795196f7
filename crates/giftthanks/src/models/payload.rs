//! Request body parsing shared by the create and update handlers.
//!
//! Both form posts and JSON bodies end up as a `serde_json::Value`, so the
//! record validation in `giftthanks_core` only has one input shape to check.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form,
};
use serde_json::{Map, Value};

use giftthanks_core::record::ValidationError;

use crate::handlers::error::{AppError, HttpError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Form,
    Json,
    Unsupported(String),
}

/// Classifies the body by its `Content-Type`. A missing header means JSON.
fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return BodyKind::Json;
    };

    let Ok(content_type) = value.to_str() else {
        return BodyKind::Unsupported("<invalid header>".to_string());
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == FORM_CONTENT_TYPE {
        BodyKind::Form
    } else if mime == JSON_CONTENT_TYPE || mime.ends_with("+json") {
        BodyKind::Json
    } else {
        BodyKind::Unsupported(mime)
    }
}

/// Reads a form or JSON body into a JSON value.
///
/// Empty form values become `null`.
///
/// # Errors
///
/// - 415 for any other content type.
/// - [`ValidationError::Malformed`] for JSON that does not parse, including
///   an empty body.
pub async fn read_payload(request: Request) -> Result<Value, AppError> {
    match body_kind(request.headers()) {
        BodyKind::Form => {
            tracing::info!("Processing FORM data");
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;
            Ok(form_to_json(fields))
        }
        BodyKind::Json => {
            tracing::info!("Processing JSON data");
            let body = Bytes::from_request(request, &())
                .await
                .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;
            serde_json::from_slice(&body).map_err(|_| ValidationError::Malformed.into())
        }
        BodyKind::Unsupported(mime) => Err(HttpError::UnsupportedMediaType(format!(
            "Content-Type must be {JSON_CONTENT_TYPE} or {FORM_CONTENT_TYPE}, got '{mime}'"
        ))
        .into()),
    }
}

fn form_to_json(fields: HashMap<String, String>) -> Value {
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| {
            let value = if value.trim().is_empty() {
                Value::Null
            } else {
                Value::String(value)
            };
            (key, value)
        })
        .collect();
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(body_kind(&headers(None)), BodyKind::Json);
        assert_eq!(
            body_kind(&headers(Some("application/json; charset=utf-8"))),
            BodyKind::Json
        );
        assert_eq!(
            body_kind(&headers(Some("application/merge-patch+json"))),
            BodyKind::Json
        );
        assert_eq!(
            body_kind(&headers(Some("application/x-www-form-urlencoded"))),
            BodyKind::Form
        );
        assert_eq!(
            body_kind(&headers(Some("text/plain"))),
            BodyKind::Unsupported("text/plain".to_string())
        );
    }

    #[test]
    fn test_form_to_json_nulls_empty_values() {
        let fields = HashMap::from([
            ("gift".to_string(), "Book".to_string()),
            ("gifter".to_string(), "".to_string()),
            ("thanked".to_string(), "  ".to_string()),
        ]);

        assert_eq!(
            form_to_json(fields),
            json!({"gift": "Book", "gifter": null, "thanked": null})
        );
    }
}
