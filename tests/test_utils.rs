#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    test, web, App, Error,
};
use async_trait::async_trait;
use consultation_api::{
    errors::EmailError,
    mailer::{EmailMessage, EmailSender, SentEmail},
    middlewares::security_headers::SecurityHeaders,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use mockall::mock;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "sales@test.local";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

mock! {
    pub Mailer {}

    #[async_trait]
    impl EmailSender for Mailer {
        async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError>;
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Consultation API Test".to_string(),
        port: 0,
        worker_count: 1,
        cors_allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        admin_email: ADMIN_EMAIL.to_string(),
        email_from: "Consultations <noreply@test.local>".to_string(),
        ..AppConfig::default()
    }
}

fn is_admin(message: &EmailMessage) -> bool {
    message.to.first().map(String::as_str) == Some(ADMIN_EMAIL)
}

/// Mailer that accepts both messages.
pub fn mailer_ok() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|m| is_admin(m))
        .times(1)
        .returning(|_| Ok(SentEmail { id: "admin-email-1".to_string() }));
    mailer
        .expect_send()
        .withf(|m| !is_admin(m))
        .times(1)
        .returning(|_| Ok(SentEmail { id: "customer-email-1".to_string() }));
    mailer
}

/// Mailer whose customer confirmation is rejected by the provider.
pub fn mailer_customer_fails() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|m| is_admin(m))
        .times(1)
        .returning(|_| Ok(SentEmail { id: "admin-email-1".to_string() }));
    mailer
        .expect_send()
        .withf(|m| !is_admin(m))
        .times(1)
        .returning(|_| Err(EmailError::Provider { status: 422, message: "Invalid recipient".to_string() }));
    mailer
}

/// Mailer whose admin notification fails; the confirmation must never be attempted.
pub fn mailer_admin_fails() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|m| is_admin(m))
        .times(1)
        .returning(|_| Err(EmailError::Transport("connection reset".to_string())));
    mailer
        .expect_send()
        .withf(|m| !is_admin(m))
        .never();
    mailer
}

pub fn state_with(mailer: Option<MockMailer>) -> web::Data<AppState> {
    state_with_config(test_config(), mailer)
}

pub fn state_with_config(config: AppConfig, mailer: Option<MockMailer>) -> web::Data<AppState> {
    let mailer = mailer.map(|m| Arc::new(m) as Arc<dyn EmailSender>);
    web::Data::new(AppState::with_mailer(config, mailer))
}

pub async fn spawn_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let origins = state.config.cors_origins();
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(SecurityHeaders::new(origins))
            .configure(configure_routes),
    )
    .await
}

pub fn valid_consultation() -> Value {
    json!({
        "fullName": "Jane O'Neil",
        "email": "  Jane.ONeil@Example.COM ",
        "phone": "07911 123456",
        "company": "O'Neil Interiors",
        "projectType": "wall-panels",
        "budget": "5k-15k",
        "timeline": "asap",
        "message": "Looking at acoustic panels for a studio.",
        "preferredContactMethod": "phone",
        "hearAboutUs": "google"
    })
}

pub fn post_consultation(ip: &str, body: &Value) -> Request {
    test::TestRequest::post()
        .uri("/consultation")
        .insert_header(("x-forwarded-for", ip))
        .insert_header(("user-agent", "integration-test"))
        .insert_header(("origin", ALLOWED_ORIGIN))
        .set_json(body)
        .to_request()
}

/// Empty-bodied submission carrying only the given headers and optional peer address.
pub fn post_from(headers: &[(&str, &str)], peer: Option<SocketAddr>) -> Request {
    let mut req = test::TestRequest::post().uri("/consultation");
    for &(name, value) in headers {
        req = req.insert_header((name, value));
    }
    if let Some(addr) = peer {
        req = req.peer_addr(addr);
    }
    req.set_json(json!({})).to_request()
}
