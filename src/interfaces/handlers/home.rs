use actix_web::{get, web, HttpResponse, Responder};

use crate::AppState;

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to the {} consultation API", state.config.brand_name),
        "status": "Ok",
        "name": state.config.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/consultation", "/health", "/env-check"]
    }))
}
