use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{
        self, HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
        ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_SECURITY_POLICY, CONTENT_TYPE,
        REFERRER_POLICY, VARY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
    },
    Error,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc, task::{Context, Poll}};

use crate::constants::{
    ALLOWED_HEADERS, ALLOWED_METHODS, CONTENT_SECURITY_POLICY as CSP, CORS_MAX_AGE_SECS,
    JSON_CONTENT_TYPE,
};

/// Adds CORS and hardening headers to every response.
///
/// `Access-Control-Allow-Origin` is only sent when the request origin is an
/// exact match for one of the allowed origins.
#[derive(Clone)]
pub struct SecurityHeaders {
    allowed_origins: Arc<Vec<String>>,
}

impl SecurityHeaders {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        SecurityHeaders {
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityHeadersService {
            service: Rc::new(service),
            allowed_origins: self.allowed_origins.clone(),
        })
    }
}

pub struct SecurityHeadersService<S> {
    service: Rc<S>,
    allowed_origins: Arc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let allowed_origin = req.headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .filter(|origin| self.allowed_origins.iter().any(|o| o == origin))
            .and_then(|origin| HeaderValue::from_str(origin).ok());

        Box::pin(async move {
            let mut res = service.call(req).await?;
            apply_security_headers(res.headers_mut(), allowed_origin);
            Ok(res)
        })
    }
}

pub fn apply_security_headers(headers: &mut HeaderMap, allowed_origin: Option<HeaderValue>) {
    if let Some(origin) = allowed_origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(CORS_MAX_AGE_SECS));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("strict-origin-when-cross-origin"));
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
}
