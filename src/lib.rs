use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod logging;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, mailer, middlewares, routes};
pub use infrastructure::{email, limiter, utils};

use email::resend::ResendMailer;
use limiter::rate_limiter::RateLimiterStore;
use mailer::EmailSender;
use use_cases::consultation::{ConsultationHandler, MailRouting};

pub struct AppState {
    pub config: settings::AppConfig,
    pub consultation_handler: ConsultationHandler,
    pub rate_limiter: RateLimiterStore,
}

impl AppState {
    /// Builds state with the Resend mailer when an API key is configured.
    pub fn new(config: settings::AppConfig) -> anyhow::Result<Self> {
        let mailer = ResendMailer::from_config(&config)?
            .map(|m| Arc::new(m) as Arc<dyn EmailSender>);

        if mailer.is_none() {
            tracing::warn!("No email provider API key configured; consultations will be refused");
        }

        Ok(Self::with_mailer(config, mailer))
    }

    pub fn with_mailer(config: settings::AppConfig, mailer: Option<Arc<dyn EmailSender>>) -> Self {
        let rate_limiter = RateLimiterStore::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        );
        let consultation_handler = ConsultationHandler::new(mailer, MailRouting::from(&config));

        AppState {
            config,
            consultation_handler,
            rate_limiter,
        }
    }
}
