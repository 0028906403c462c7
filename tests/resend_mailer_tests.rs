use std::net::TcpListener;

use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};
use consultation_api::{
    email::resend::ResendMailer,
    errors::EmailError,
    mailer::{EmailMessage, EmailSender},
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use zeroize::Zeroizing;

const API_KEY: &str = "re_test_key";

/// Requests seen by the stub provider: `Authorization` header and JSON body.
type Captured = web::Data<Mutex<Vec<(Option<String>, Value)>>>;

async fn emails(req: HttpRequest, body: web::Json<Value>, captured: Captured) -> HttpResponse {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = body.into_inner();
    let recipient = body["to"][0].as_str().unwrap_or_default().to_string();
    captured.lock().push((authorization, body));

    match recipient.as_str() {
        "reject@example.com" => HttpResponse::UnprocessableEntity().json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Invalid `to` field."
        })),
        "outage@example.com" => HttpResponse::BadGateway().body("upstream unavailable"),
        "garbled@example.com" => HttpResponse::Ok().body("not json"),
        _ => HttpResponse::Ok().json(json!({ "id": "4ef9a417-02e9-4d39-ad75-9611e0fcc33c" })),
    }
}

struct StubProvider {
    base_url: String,
    captured: Captured,
    handle: ServerHandle,
}

fn spawn_provider() -> StubProvider {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let captured: Captured = web::Data::new(Mutex::new(Vec::new()));

    let data = captured.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/emails", web::post().to(emails))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    StubProvider {
        base_url: format!("http://127.0.0.1:{port}"),
        captured,
        handle,
    }
}

fn message(to: &str, reply_to: Option<&str>) -> EmailMessage {
    EmailMessage {
        from: "Consultations <noreply@test.local>".to_string(),
        to: vec![to.to_string()],
        subject: "New consultation request".to_string(),
        html: "<p>Hello</p>".to_string(),
        text: "Hello".to_string(),
        reply_to: reply_to.map(str::to_string),
    }
}

fn mailer(provider: &StubProvider) -> ResendMailer {
    ResendMailer::new(&provider.base_url, Zeroizing::new(API_KEY.to_string()))
        .expect("Failed to build mailer")
}

#[actix_rt::test]
async fn accepted_message_returns_provider_id() {
    let provider = spawn_provider();
    let mailer = mailer(&provider);

    let sent = mailer
        .send(&message("sales@test.local", Some("jane@example.com")))
        .await
        .expect("send should succeed");
    assert_eq!(sent.id, "4ef9a417-02e9-4d39-ad75-9611e0fcc33c");

    let captured = provider.captured.lock().clone();
    assert_eq!(captured.len(), 1);
    let (authorization, body) = &captured[0];
    assert_eq!(authorization.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(body["from"], "Consultations <noreply@test.local>");
    assert_eq!(body["to"], json!(["sales@test.local"]));
    assert_eq!(body["subject"], "New consultation request");
    assert_eq!(body["html"], "<p>Hello</p>");
    assert_eq!(body["text"], "Hello");
    assert_eq!(body["reply_to"], "jane@example.com");

    provider.handle.stop(false).await;
}

#[actix_rt::test]
async fn reply_to_is_omitted_when_absent() {
    let provider = spawn_provider();

    mailer(&provider)
        .send(&message("jane@example.com", None))
        .await
        .expect("send should succeed");

    let captured = provider.captured.lock().clone();
    assert!(captured[0].1.get("reply_to").is_none());

    provider.handle.stop(false).await;
}

#[actix_rt::test]
async fn rejected_message_carries_provider_message() {
    let provider = spawn_provider();

    let err = mailer(&provider)
        .send(&message("reject@example.com", None))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EmailError::Provider {
            status: 422,
            message: "Invalid `to` field.".to_string()
        }
    );

    provider.handle.stop(false).await;
}

#[actix_rt::test]
async fn non_json_error_body_falls_back_to_status() {
    let provider = spawn_provider();

    let err = mailer(&provider)
        .send(&message("outage@example.com", None))
        .await
        .unwrap_err();
    match err {
        EmailError::Provider { status, message } => {
            assert_eq!(status, 502);
            assert!(message.starts_with("HTTP 502"), "unexpected message: {message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }

    provider.handle.stop(false).await;
}

#[actix_rt::test]
async fn success_without_id_is_an_invalid_response() {
    let provider = spawn_provider();

    let err = mailer(&provider)
        .send(&message("garbled@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, EmailError::InvalidResponse(_)));

    provider.handle.stop(false).await;
}

#[actix_rt::test]
async fn unreachable_provider_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mailer = ResendMailer::new(
        &format!("http://127.0.0.1:{port}"),
        Zeroizing::new(API_KEY.to_string()),
    )
    .unwrap();

    let err = mailer.send(&message("sales@test.local", None)).await.unwrap_err();
    assert!(matches!(err, EmailError::Transport(_)));
}
