use actix_web::{http::Method, web};

use crate::handlers::consultation;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/consultation")
            .route(web::post().to(consultation::submit_consultation))
            .route(web::method(Method::OPTIONS).to(consultation::preflight))
            .default_service(web::route().to(consultation::method_not_allowed))
    );
}
