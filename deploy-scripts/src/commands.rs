//! Implementations of the deploy script commands

use std::path::Path;

use alloy_primitives::{Address, Bytes};
use tracing::info;

use crate::{
    artifacts::{find_artifact, ContractArtifact},
    cli::{CompileArgs, DeployArgs, NetworkSelection},
    compiler,
    config::ProjectConfig,
    deployer::{ContractDeployer, RpcDeployer},
    deployments::{write_deployment, DeploymentRecord},
    errors::ScriptError,
    solidity::{ConstructorAddresses, DeployTarget, DEPLOYMENT_ORDER},
    utils::setup_client,
};

/// A contract deployed during a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// Which contract was deployed
    pub target: DeployTarget,
    /// The address it was deployed at
    pub address: Address,
}

/// Deploy the project's contracts to the selected network
pub async fn deploy(
    args: DeployArgs,
    network: NetworkSelection,
    config: &ProjectConfig,
) -> Result<(), ScriptError> {
    let network = config.resolve_network(&network.name, network.rpc_url, network.priv_key)?;
    let deployer = RpcDeployer::new(setup_client(&network).await?);

    let addresses = ConstructorAddresses {
        stablecoin: args.stablecoin,
        team: args.team,
        investor: args.investor,
    };
    let deployed = deploy_contracts(&deployer, &config.paths.artifacts, &addresses).await?;

    if let Some(path) = args.deployments {
        let record = DeploymentRecord::new(
            deployer.chain_id(),
            deployer.deployer_address(),
            &deployed,
        );
        write_deployment(&path, &network.name, record)?;
        info!("Deployment recorded in {}", path.display());
    }

    Ok(())
}

/// Deploy `Vault`, `MainProject` and `GovernanceToken`, in that order.
///
/// Each deployment is included on chain before the next is sent. The first failure
/// aborts the run; contracts already deployed are left in place.
///
/// All artifacts are read up front, so a missing or mismatched artifact fails
/// the run before anything is deployed.
pub async fn deploy_contracts<D: ContractDeployer>(
    deployer: &D,
    artifacts_dir: &Path,
    addresses: &ConstructorAddresses,
) -> Result<Vec<DeployedContract>, ScriptError> {
    info!(
        "Deploying contracts with the account: {}",
        deployer.deployer_address()
    );

    // Build every contract's init code before sending any transaction
    let init_codes = DEPLOYMENT_ORDER
        .into_iter()
        .map(|target| {
            let artifact = find_artifact(artifacts_dir, target.contract_name())?;
            Ok((target, init_code(target, &artifact, addresses)?))
        })
        .collect::<Result<Vec<_>, ScriptError>>()?;

    let mut deployed = Vec::with_capacity(init_codes.len());
    for (target, code) in init_codes {
        let address = deployer.deploy(code).await?;
        info!("{} deployed at: {}", target.label(), address);

        deployed.push(DeployedContract { target, address });
    }

    Ok(deployed)
}

/// Build the init code for a contract: its creation bytecode followed by its
/// ABI-encoded constructor arguments
pub fn init_code(
    target: DeployTarget,
    artifact: &ContractArtifact,
    addresses: &ConstructorAddresses,
) -> Result<Bytes, ScriptError> {
    let expected = target.constructor_inputs();
    let found = artifact.constructor_inputs();
    if found != expected {
        return Err(ScriptError::CalldataConstruction(format!(
            "{} constructor takes ({}) in its artifact, expected ({})",
            target,
            found.join(", "),
            expected.join(", ")
        )));
    }

    let mut code = artifact.creation_code()?.to_vec();
    code.extend(target.constructor_args(addresses));

    Ok(code.into())
}

/// Compile the project's Solidity sources into artifacts
pub fn compile(args: CompileArgs, config: &ProjectConfig) -> Result<(), ScriptError> {
    let sources_dir = args.sources.as_deref().unwrap_or(config.paths.sources.as_path());
    let artifacts = compiler::compile(
        &args.solc,
        sources_dir,
        &config.paths.artifacts,
        &config.paths.libraries,
        &config.solidity,
    )?;

    info!(
        "Compiled {} contracts into {}",
        artifacts.len(),
        config.paths.artifacts.display()
    );
    Ok(())
}

/// Print the effective project configuration
pub fn show_config(config: &ProjectConfig) -> Result<(), ScriptError> {
    println!("{}", config.to_toml()?);
    Ok(())
}
