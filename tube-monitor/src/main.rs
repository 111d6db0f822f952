use tracing::info;
use tracing_subscriber::EnvFilter;

use tube_monitor::config::Config;
use tube_monitor::monitor::Monitor;
use tube_monitor::notify::TelegramNotifier;
use tube_monitor::report::RecipeBook;
use tube_monitor::tfl::TflClient;

#[tokio::main]
async fn main() {
    // Default to info; override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let client = TflClient::new(config.tfl).expect("Failed to create TfL client");
    let notifier = TelegramNotifier::new(config.telegram);

    let line_names: Vec<&str> = config.lines.iter().map(|l| l.as_str()).collect();
    info!(lines = ?line_names, "tube monitor starting");

    let monitor = Monitor::new(client, notifier, RecipeBook::default_lines(), config.lines);

    // Initial check on startup, then the weekday timetable.
    monitor.run_cycle().await;
    monitor.run_scheduled(&config.timetable).await;
}
