//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{compile, deploy, show_config},
    config::ProjectConfig,
    constants::{
        DEFAULT_NETWORK, INVESTOR_ADDRESS, SOLC_COMMAND, STABLECOIN_ADDRESS, TEAM_ADDRESS,
    },
    errors::ScriptError,
};

/// Compile and deploy the project's contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML file overriding the built-in project configuration
    #[arg(short, long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// The configured network to use
    #[arg(short, long, env = "DEPLOY_NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Network RPC URL, overriding the network's configured environment variable
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Private key of the deployer, overriding the network's configured
    /// environment variable
    #[arg(short, long)]
    pub priv_key: Option<String>,

    /// Directory containing the compilation artifacts
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy Vault, MainProject and GovernanceToken, in that order
    Deploy(DeployArgs),
    /// Compile the Solidity sources into artifacts
    Compile(CompileArgs),
    /// Print the effective project configuration
    ShowConfig,
}

impl Command {
    /// Run the command against the given configuration
    pub async fn run(
        self,
        config: &ProjectConfig,
        network: NetworkSelection,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, network, config).await,
            Command::Compile(args) => compile(args, config),
            Command::ShowConfig => show_config(config),
        }
    }
}

/// The network chosen on the command line, with any explicit overrides
pub struct NetworkSelection {
    /// The name of the configured network
    pub name: String,
    /// An RPC URL overriding the network's configuration
    pub rpc_url: Option<String>,
    /// A private key overriding the network's configuration
    pub priv_key: Option<String>,
}

/// Deploy the project's contracts.
///
/// `Vault` is constructed with the stablecoin address, `MainProject` takes no
/// arguments and `GovernanceToken` is constructed with the team and investor
/// addresses.
#[derive(Args)]
pub struct DeployArgs {
    /// Address of the stablecoin held by the vault
    #[arg(long, default_value_t = STABLECOIN_ADDRESS)]
    pub stablecoin: Address,

    /// Address of the team wallet
    #[arg(long, default_value_t = TEAM_ADDRESS)]
    pub team: Address,

    /// Address of the investor wallet
    #[arg(long, default_value_t = INVESTOR_ADDRESS)]
    pub investor: Address,

    /// Path of a `deployments.json` file to record the deployed addresses in
    #[arg(short, long)]
    pub deployments: Option<PathBuf>,
}

/// Compile the Solidity sources
#[derive(Args)]
pub struct CompileArgs {
    /// The `solc` binary to compile with
    #[arg(long, default_value = SOLC_COMMAND)]
    pub solc: String,

    /// Directory containing the Solidity sources, overriding the configuration
    #[arg(short, long)]
    pub sources: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_not_read_from_network_env() {
        // Credentials for one network must not leak into another
        std::env::set_var("SEPOLIA_RPC_URL", "https://sepolia.example");
        std::env::set_var("PRIVATE_KEY", "0x01");

        let cli = Cli::try_parse_from(["project-deploy", "--network", "localhost", "show-config"])
            .unwrap();

        assert_eq!(cli.network, "localhost");
        assert_eq!(cli.rpc_url, None);
        assert_eq!(cli.priv_key, None);
    }

    #[test]
    fn test_deploy_defaults() {
        let cli = Cli::try_parse_from(["project-deploy", "deploy"]).unwrap();
        let Command::Deploy(args) = cli.command else {
            panic!("expected the deploy command");
        };

        assert_eq!(cli.network, "sepolia");
        assert_eq!(args.stablecoin, STABLECOIN_ADDRESS);
        assert_eq!(args.team, TEAM_ADDRESS);
        assert_eq!(args.investor, INVESTOR_ADDRESS);
        assert_eq!(args.deployments, None);
    }
}
