use actix_web::web;

use crate::handlers::{home::home, system};

mod consultation;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(system::health_check)
        .service(system::env_check)
        .configure(consultation::config_routes);
}
