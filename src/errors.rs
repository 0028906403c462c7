use std::collections::BTreeMap;
use std::fmt;

use actix_web::{
    error::{PayloadError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::{
    constants::{ALLOWED_METHODS, ALTERNATIVE_OPTIONS},
    settings::{default_support_email, default_support_phone},
};

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    MethodNotAllowed,
    RateLimited(RateLimitRejection),
    ServiceNotConfigured,
    InternalError(String),
}

/// Details of a request refused by the per-IP limiter.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitRejection {
    pub retry_after_secs: u64,
    pub limit: u32,
    pub window_secs: u64,
    pub reset_time: DateTime<Utc>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::RateLimited(r) => write!(f, "Rate limited, retry after {}s", r.retry_after_secs),
            AppError::ServiceNotConfigured => write!(f, "Email service is not configured"),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        let body = match self {
            AppError::ValidationError(errors) => {
                let fields: BTreeMap<&str, &str> = errors
                    .iter()
                    .map(|e| (e.field.as_str(), e.message.as_str()))
                    .collect();
                serde_json::json!({
                    "error": "Consultation Validation Failed",
                    "message": "Please correct the highlighted fields and try again.",
                    "fields": fields,
                    "timestamp": timestamp(),
                })
            }
            AppError::MethodNotAllowed => {
                builder.insert_header((header::ALLOW, ALLOWED_METHODS));
                serde_json::json!({
                    "error": "Method Not Allowed",
                    "message": "Consultation requests must be submitted with POST.",
                    "allowedMethods": ["POST", "OPTIONS"],
                })
            }
            AppError::RateLimited(rejection) => {
                builder.insert_header((header::RETRY_AFTER, rejection.retry_after_secs.to_string()));
                serde_json::json!({
                    "error": "Rate Limit Exceeded",
                    "message": format!(
                        "Too many consultation requests. Please wait {} seconds before trying again.",
                        rejection.retry_after_secs
                    ),
                    "retryAfter": rejection.retry_after_secs,
                    "details": {
                        "limit": rejection.limit,
                        "window": rejection.window_secs,
                        "remaining": 0,
                        "resetTime": rejection.reset_time.to_rfc3339_opts(SecondsFormat::Millis, true),
                    }
                })
            }
            AppError::ServiceNotConfigured => {
                serde_json::json!({
                    "error": "Service Configuration Error",
                    "message": "Our online consultation service is temporarily unavailable. Please contact us directly.",
                    "contact": {
                        "phone": default_support_phone(),
                        "email": default_support_email(),
                    }
                })
            }
            AppError::InternalError(_) => {
                serde_json::json!({
                    "error": "Consultation Processing Error",
                    "message": "We are experiencing technical difficulties processing your request. Please try again shortly or contact us directly.",
                    "details": {
                        "timestamp": timestamp(),
                        "supportContact": default_support_email(),
                        "alternativeOptions": ALTERNATIVE_OPTIONS,
                    }
                })
            }
        };

        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Errors that reach the operator log rather than being the caller's fault.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, AppError::InternalError(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(field_errors(&errors))
    }
}

/// Flattens `ValidationErrors` into one entry per failing field, keeping the first message.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .filter_map(|(field, errors)| {
            errors.first().map(|e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("Invalid JSON body: {}", err))
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        AppError::InternalError(format!("Failed to read request body: {}", err))
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum EmailError {
    #[display("Email transport error: {_0}")]
    Transport(String),

    #[display("Email provider rejected message ({status}): {message}")]
    Provider { status: u16, message: String },

    #[display("Unexpected email provider response: {_0}")]
    InvalidResponse(String),
}

impl std::error::Error for EmailError {}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
