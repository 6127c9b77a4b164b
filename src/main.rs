mod api;
mod app;
mod application;
mod domain;
mod settings;
mod ui;
mod utils;

use tracing::{error, info};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "banana_music=info".into());

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = settings::AppConfig::from_env().unwrap_or_else(|e| {
        error!(error = %e, "Invalid configuration, falling back to defaults");
        settings::AppConfig::default()
    });

    info!(
        api = %config.api_base_url,
        deployment = ?config.api_config().deployment(),
        "Starting Banana Music"
    );

    iced::application(
        move || app::DownloadApp::new(&config),
        app::update,
        app::view,
    )
    .title("Banana Music")
    .run()
}
