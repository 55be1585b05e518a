#[macro_use]
extern crate rust_i18n;

mod commands;
mod shutdown;
mod startup;

use tracing::info;

// Initialize i18n
i18n!("locales", fallback = "es");

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting reservas");

    // Load configuration
    let config = startup::load_config().await?;

    // Start the console client
    startup::start_app(config).await
}
