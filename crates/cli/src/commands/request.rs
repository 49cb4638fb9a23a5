use clap::Subcommand;
use logpoll_core::{
    chain::{Chain, ChainKind, Conflux, Ethereum},
    config::AppConfig,
    connector::LogConnector,
};

use super::utils::{CliError, CliResult};

#[derive(Subcommand, Clone, Copy)]
pub enum RequestCommands {
    /// Print the logs request the connector would send next
    Fetch,

    /// Print the connectivity probe request
    Probe,
}

pub fn handle_request_command(command: RequestCommands, config: &AppConfig) -> CliResult<()> {
    let body = match config.endpoint.chain {
        ChainKind::Conflux => build::<Conflux>(command, config),
        ChainKind::Ethereum => build::<Ethereum>(command, config),
    }?;

    println!("{body}");
    Ok(())
}

fn build<C: Chain>(command: RequestCommands, config: &AppConfig) -> CliResult<String> {
    let connector =
        LogConnector::<C>::from_subscription(&config.subscription, config.endpoint.connection);

    let request = match command {
        RequestCommands::Fetch => connector.fetch_request(),
        RequestCommands::Probe => connector.probe_request(),
    };

    let request = request.ok_or_else(|| {
        CliError::General(format!(
            "no request to send for a {} connection",
            config.endpoint.connection
        ))
    })?;

    Ok(String::from_utf8_lossy(&request).into_owned())
}
