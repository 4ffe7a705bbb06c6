use clap::Parser;
use deploy_scripts::{
    cli::{Cli, NetworkSelection},
    config::{load_dotenv, ProjectConfig},
    errors::ScriptError,
    utils::setup_logging,
};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load `.env` first so that it can supply `RUST_LOG` and CLI arguments
    let dotenv = load_dotenv();
    setup_logging();
    if let Some(path) = dotenv.inspect_err(|e| error!("{}", e))? {
        debug!("loaded environment from {}", path.display());
    }

    let Cli {
        config,
        network,
        rpc_url,
        priv_key,
        artifacts,
        command,
    } = Cli::parse();

    let mut config = ProjectConfig::load(config.as_deref())
        .inspect_err(|e| error!("{}", e))?;
    if let Some(artifacts) = artifacts {
        config.paths.artifacts = artifacts;
    }

    let network = NetworkSelection {
        name: network,
        rpc_url,
        priv_key,
    };

    command
        .run(&config, network)
        .await
        .inspect_err(|e| error!("{}", e))
}
