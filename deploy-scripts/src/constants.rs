//! Constants used in the deploy scripts

use alloy_primitives::{address, Address};

/// The address of the stablecoin held by the vault
pub const STABLECOIN_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// The address of the investor wallet receiving a governance token allocation
pub const INVESTOR_ADDRESS: Address = address!("bA93A83d5158A07628c1B9cE7458db4F2bb33e7d");

/// The address of the team wallet receiving a governance token allocation
pub const TEAM_ADDRESS: Address = address!("bA93A83d5158A07628c1B9cE7458db4F2bb33e7d");

/// The number of times to query for a deployment transaction's receipt
pub const RECEIPT_POLL_ATTEMPTS: usize = 90;

/// The delay between receipt queries, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2000;

// ---------------
// | Environment |
// ---------------

/// The environment variable holding the Sepolia RPC URL
pub const SEPOLIA_RPC_URL_ENV_VAR: &str = "SEPOLIA_RPC_URL";

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The environment variable used to configure log filtering
pub const LOG_FILTER_ENV_VAR: &str = "RUST_LOG";

/// The log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

// ------------
// | Defaults |
// ------------

/// The name of the network deployed to when none is given
pub const DEFAULT_NETWORK: &str = "sepolia";

/// The Solidity compiler version the contracts are built with
pub const DEFAULT_SOLC_VERSION: &str = "0.8.28";

/// The number of optimizer runs the contracts are built with
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// The directory containing the Solidity sources
pub const DEFAULT_SOURCES_DIR: &str = "contracts";

/// The directory compilation artifacts are written to
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The directory imported packages are installed in
pub const DEFAULT_LIBRARIES_DIR: &str = "node_modules";

/// The name of the `solc` command
pub const SOLC_COMMAND: &str = "solc";

// -------------
// | Artifacts |
// -------------

/// The extension of a Solidity source file
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of a JSON artifact file
pub const JSON_EXTENSION: &str = "json";

/// The format tag written into generated artifacts
pub const ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";

/// The `solc` output severity that fails a compilation
pub const SOLC_ERROR_SEVERITY: &str = "error";
