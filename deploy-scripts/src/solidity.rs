//! Definitions of the Solidity constructors called during deployment

use std::fmt::{self, Display};

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolConstructor};

use crate::constants::{INVESTOR_ADDRESS, STABLECOIN_ADDRESS, TEAM_ADDRESS};

sol! {
    #[allow(missing_docs)]
    contract Vault {
        constructor(address stablecoin);
    }

    #[allow(missing_docs)]
    contract GovernanceToken {
        constructor(address team, address investor);
    }
}

/// The contracts deployed by the project, in deployment order
pub const DEPLOYMENT_ORDER: [DeployTarget; 3] = [
    DeployTarget::Vault,
    DeployTarget::MainProject,
    DeployTarget::GovernanceToken,
];

/// A contract deployed by the project
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeployTarget {
    /// The stablecoin vault
    Vault,
    /// The main project contract
    MainProject,
    /// The governance token
    GovernanceToken,
}

impl DeployTarget {
    /// The name of the contract, as it appears in its artifact
    pub fn contract_name(&self) -> &'static str {
        match self {
            DeployTarget::Vault => "Vault",
            DeployTarget::MainProject => "MainProject",
            DeployTarget::GovernanceToken => "GovernanceToken",
        }
    }

    /// The label used when logging the deployed address
    pub fn label(&self) -> &'static str {
        match self {
            DeployTarget::Vault => "Vault",
            DeployTarget::MainProject => "Main project",
            DeployTarget::GovernanceToken => "GovernanceToken",
        }
    }

    /// ABI-encode the constructor arguments for this contract
    pub fn constructor_args(&self, addresses: &ConstructorAddresses) -> Vec<u8> {
        match self {
            DeployTarget::Vault => Vault::constructorCall {
                stablecoin: addresses.stablecoin,
            }
            .abi_encode(),
            DeployTarget::MainProject => Vec::new(),
            DeployTarget::GovernanceToken => GovernanceToken::constructorCall {
                team: addresses.team,
                investor: addresses.investor,
            }
            .abi_encode(),
        }
    }

    /// The ABI types of the constructor's inputs, in order
    pub fn constructor_inputs(&self) -> &'static [&'static str] {
        match self {
            DeployTarget::Vault => &["address"],
            DeployTarget::MainProject => &[],
            DeployTarget::GovernanceToken => &["address", "address"],
        }
    }
}

impl Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contract_name())
    }
}

/// The externally owned addresses wired into the contract constructors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstructorAddresses {
    /// The stablecoin held by the vault
    pub stablecoin: Address,
    /// The team wallet
    pub team: Address,
    /// The investor wallet
    pub investor: Address,
}

impl Default for ConstructorAddresses {
    fn default() -> Self {
        Self {
            stablecoin: STABLECOIN_ADDRESS,
            team: TEAM_ADDRESS,
            investor: INVESTOR_ADDRESS,
        }
    }
}
