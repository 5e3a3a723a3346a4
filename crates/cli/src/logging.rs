use anyhow::Result;
use medportal_core::tracing::{InstrumentationConfig, init_tracing};
use tracing::Level;

/// Initialize logging for the CLI
///
/// `RUST_LOG` still takes precedence over the level given here.
pub fn init_logging(log_level: Level, json: bool) -> Result<()> {
    let level_str = log_level.as_str().to_lowercase();
    let mut config = InstrumentationConfig::from_env().with_log_level(format!(
        "medportal={level_str},medportal_client={level_str},medportal_core={level_str}"
    ));
    config.json |= json;
    init_tracing(&config)
}
