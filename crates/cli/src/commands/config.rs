use clap::Subcommand;
use logpoll_core::config::AppConfig;
use std::path::Path;

use super::{
    load_config,
    utils::{print_info, print_success, CliError, CliResult},
};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration
    Validate,

    /// Show the effective configuration after file and environment overrides
    Show,

    /// Generate a sample configuration file
    Generate {
        /// Output path for the config file
        #[arg(short, long, default_value = "config/config.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands, file: Option<&str>) -> CliResult<()> {
    match command {
        ConfigCommands::Validate => validate_config(file),
        ConfigCommands::Show => show_config(file),
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(file: Option<&str>) -> CliResult<()> {
    if let Some(file) = file {
        if !Path::new(file).exists() {
            return Err(CliError::Config(format!("File not found: {file}")));
        }
        print_info(&format!("Loading configuration from {file}..."));
    }

    let config = load_config(file)?;

    print_info("Validating configuration...");
    config.validate().map_err(CliError::Config)?;

    print_success("Configuration is valid!");

    println!("Configuration Summary:");
    println!(
        "  Endpoint: {} ({}, {})",
        config.endpoint.url, config.endpoint.chain, config.endpoint.connection
    );
    println!("  Addresses: {}", config.subscription.addresses.len());
    println!("  Topics: {}", config.subscription.topics.len());
    println!("  Poll Interval: {}ms", config.polling.interval_ms);

    Ok(())
}

fn show_config(file: Option<&str>) -> CliResult<()> {
    let config = load_config(file)?;
    print_config(&config);
    Ok(())
}

fn print_config(config: &AppConfig) {
    println!("\n[Endpoint]");
    println!("  URL: {}", config.endpoint.url);
    println!("  Chain: {}", config.endpoint.chain);
    println!("  Connection: {}", config.endpoint.connection);
    println!("  Timeout: {}s", config.endpoint.timeout_seconds);

    println!("\n[Subscription]");
    for address in &config.subscription.addresses {
        println!("  Address: {address}");
    }
    for topic in &config.subscription.topics {
        println!("  Topic: {topic}");
    }

    println!("\n[Polling]");
    println!("  Interval: {}ms", config.polling.interval_ms);
    println!("  Event Buffer: {}", config.polling.event_buffer);

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);
}

const SAMPLE_CONFIG: &str = r#"# logpoll configuration

[endpoint]
url = "http://127.0.0.1:12537"
chain = "conflux"
connection = "rpc"
timeout_seconds = 30

[subscription]
# Contract addresses to watch. Empty watches every contract.
addresses = []
# Event signatures. Any of them matches.
topics = []

[polling]
interval_ms = 5000
event_buffer = 1024

[logging]
level = "info"
format = "pretty"
"#;

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    let path = Path::new(output);
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "File {output} already exists. Use --force to overwrite."
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, SAMPLE_CONFIG)?;

    print_success(&format!("Sample configuration written to {output}"));
    Ok(())
}
