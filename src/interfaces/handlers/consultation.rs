use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::{SecondsFormat, Utc};
use futures_util::StreamExt;

use crate::{
    entities::consultation::{ConsultationRequest, ConsultationResponse, RequestMeta},
    errors::{field_errors, AppError, RateLimitRejection},
    limiter::rate_limiter::RateLimitDecision,
    utils::get_client_ip::get_client_ip,
    validation::validate_consultation_data,
    AppState,
};

/// CORS preflight. Headers come from the security middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::InternalError(format!(
                "Request body exceeds {} bytes",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn process_submission(
    state: &AppState,
    payload: web::Payload,
    meta: RequestMeta,
) -> Result<ConsultationResponse, AppError> {
    let body = read_body(payload, state.config.max_body_bytes).await?;
    let request: ConsultationRequest = serde_json::from_slice(&body)?;

    let data = validate_consultation_data(&request, meta).map_err(|errors| {
        let fields = field_errors(&errors);
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        tracing::info!(fields = ?names, "Consultation validation failed");
        AppError::ValidationError(fields)
    })?;

    state.consultation_handler.submit_consultation(&data).await
}

/// `POST /consultation`
pub async fn submit_consultation(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let client_ip = get_client_ip(&req, state.config.trust_proxy_headers);

    let decision = state.rate_limiter.check(&client_ip);
    if let RateLimitDecision::Limited { retry_after_secs, .. } = decision {
        tracing::warn!(client_ip = %client_ip, retry_after_secs, "Consultation rate limit exceeded");
        return Err(AppError::RateLimited(RateLimitRejection {
            retry_after_secs,
            limit: state.rate_limiter.limit(),
            window_secs: state.rate_limiter.window().as_secs(),
            reset_time: decision.reset_at(),
        }));
    }

    if !state.consultation_handler.is_configured() {
        tracing::error!("Email provider API key is not configured");
        return Err(AppError::ServiceNotConfigured);
    }

    let user_agent = header_value(&req, header::USER_AGENT);

    let meta = RequestMeta {
        ip_address: Some(client_ip.clone()),
        user_agent: user_agent.clone(),
    };

    match process_submission(&state, payload, meta).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            if e.is_server_fault() {
                let origin = header_value(&req, header::ORIGIN);
                tracing::error!(
                    error = %e,
                    timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    user_agent = user_agent.as_deref().unwrap_or("unknown"),
                    origin = origin.as_deref().unwrap_or("unknown"),
                    client_ip = %client_ip,
                    "Consultation processing error"
                );
            }
            Err(e)
        }
    }
}
