use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::AppEnvironment;

pub fn init_logging(env: &AppEnvironment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match env {
        AppEnvironment::Development => "consultation_api=debug,actix_web=info,info".into(),
        AppEnvironment::Testing => "consultation_api=debug,warn".into(),
        AppEnvironment::Production => "consultation_api=info,actix_web=info,warn".into(),
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    // JSON lines in production, human-readable elsewhere
    if matches!(env, AppEnvironment::Production) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!("Logging initialized for {} environment", env);
}
