use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use consultation_api::{
    background_task::start_rate_limit_sweep,
    graceful_shutdown::shutdown_signal,
    logging::init_logging,
    middlewares::security_headers::SecurityHeaders,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.env);
    tracing::info!("Loaded configuration: {:?}", config);

    let server_addr = format!("{}:{}", config.host, config.port);
    let workers = config.worker_count;
    let allowed_origins = config.cors_origins();
    let sweep_every = config.rate_limit_sweep_interval();

    let app_state = match AppState::new(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to build application state: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🚀 Starting Consultation API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let limiter = app_state.rate_limiter.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(SecurityHeaders::new(allowed_origins.clone()))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_rate_limit_sweep(limiter, sweep_every));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
