use anyhow::Result;
use clap::{Parser, Subcommand};
use logpoll_core::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{
    handle_config_command, handle_request_command, load_config, run_poller, ConfigCommands,
    RequestCommands,
};

#[derive(Parser)]
#[command(name = "logpoll")]
#[command(about = "Poll a chain node for contract event logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (defaults to $LOGPOLL_CONFIG or config/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the configured node and print events as JSON lines
    Run,

    /// Print the request bodies the connector would send
    #[command(subcommand)]
    Request(RequestCommands),

    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Initializes logging to stderr; stdout is reserved for events.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
        let level = &config.logging.level;
        EnvFilter::new(format!("warn,logpoll_core={level},cli={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let file = cli.config.as_deref();

    match cli.command {
        Commands::Run => {
            let config = load_config(file)?;
            config.validate().map_err(anyhow::Error::msg)?;
            init_logging(&config);
            run_poller(&config).await?;
        }

        Commands::Request(request_command) => {
            let config = load_config(file)?;
            handle_request_command(request_command, &config)?;
        }

        Commands::Config(config_command) => {
            if let Err(e) = handle_config_command(config_command, file) {
                commands::utils::print_error(&e.to_string());
                return Err(e.into());
            }
        }
    }

    Ok(())
}
