use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, FieldViolation};

/// JSON body extractor that hands the handler an already-validated payload.
///
/// Malformed JSON, a wrong content type and failed field rules reject with a
/// 400 envelope; a body over the route's size limit with a 413.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;

        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::validation("Content-Type must be application/json")
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::PayloadTooLarge("Request body too large".to_string())
        }
        other => ApiError::Validation {
            message: "Invalid JSON format".to_string(),
            errors: vec![FieldViolation {
                field: "body".to_string(),
                message: other.body_text(),
            }],
        },
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = camel_case(&field);
                errs.iter()
                    .map(|e| FieldViolation {
                        field: field.clone(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid")),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        violations.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::Validation {
            message: "Request validation failed".to_string(),
            errors: violations,
        }
    }
}

/// Field names are reported the way clients spell them (`first_name` -> `firstName`).
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
