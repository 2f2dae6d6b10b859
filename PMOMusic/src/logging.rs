//! Initialisation du logging à partir de la configuration

use pmoconfig::Config;
use tracing::Level;
use tracing_subscriber::{Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Convertit un nom de niveau (insensible à la casse) en `Level`
pub fn string_to_level(level: &str) -> Option<Level> {
    match level.to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

/// Installe le subscriber global
///
/// Le niveau minimum vient de `host.logger.min_level`, la sortie console de
/// `host.logger.enable_console`. Les logs vont sur stderr pour laisser stdout
/// aux réponses JSON.
pub fn init_logging(config: &Config) {
    let filter = config
        .get_log_min_level()
        .ok()
        .and_then(|level| string_to_level(&level))
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::INFO);

    let subscriber = Registry::default().with(filter);

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}
