use crate::commands::{dispatch, CommandContext, ConsoleCommand, Flow};
use crate::shutdown;
use reservas::components::{
    AppContext, ComponentManager, NotificationCenter, ReservationCalendar,
};
use reservas::config::Config;
use reservas::error::{other_error, AppResult};
use reservas::terminal::TerminalSurface;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the components and run the console until quit or a shutdown signal
pub async fn start_app(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (locale, timezone, space_id) = {
        let config_read = config.read().await;
        (
            config_read.locale.clone(),
            config_read.tz(),
            config_read.space_id.clone(),
        )
    };

    reservas::utils::i18n::set_locale(&locale);
    info!("Setting locale to {}", locale);

    let surface = Arc::new(TerminalSurface);
    let ctx = AppContext::new(surface.clone(), surface);

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(ReservationCalendar::new());
    component_manager.register(NotificationCenter::new());
    component_manager.init_all(&ctx).await?;
    let component_manager = Arc::new(component_manager);

    let commands = CommandContext::new(Arc::clone(&component_manager), ctx.controls.clone(), timezone);
    if space_id.is_some() {
        ctx.controls.select_space(space_id);
    }
    commands.show_month(commands.current_month().await).await;

    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(shutdown::handle_signals(shutdown_send));

    tokio::select! {
        result = console_loop(&commands) => {
            if let Err(e) = result {
                error!("Console input failed: {}", e);
            }
        }
        _ = shutdown_recv => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = component_manager.shutdown_all().await {
        error!("Error shutting down components: {:?}", e);
    } else {
        info!("All components shut down successfully");
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
async fn console_loop(commands: &CommandContext) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.parse::<ConsoleCommand>() {
            Ok(command) => match dispatch(command, commands).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => error!("Command failed: {}", e),
            },
            Err(e) => {
                if let Some(message) = e.message() {
                    println!("{}", message);
                }
            }
        }
    }
    Ok(())
}
