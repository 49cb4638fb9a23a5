pub mod config;
pub mod request;
pub mod run;
pub mod utils;

pub use config::{handle_config_command, ConfigCommands};
pub use request::{handle_request_command, RequestCommands};
pub use run::run_poller;

use logpoll_core::config::AppConfig;
use utils::CliResult;

/// Loads configuration from `path`, or from `LOGPOLL_CONFIG` / `config/config.toml` when no
/// path is given.
pub fn load_config(path: Option<&str>) -> CliResult<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}
