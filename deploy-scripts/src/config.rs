//! Project configuration: Solidity compiler settings, named networks and
//! project paths.
//!
//! The built-in defaults describe the Sepolia deployment the project ships with.
//! A TOML file may override any section; networks named in the file are added
//! alongside the default `sepolia` network.

use std::{
    collections::BTreeMap,
    env,
    fmt::{self, Debug, Formatter},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_LIBRARIES_DIR, DEFAULT_NETWORK, DEFAULT_OPTIMIZER_RUNS,
        DEFAULT_SOLC_VERSION, DEFAULT_SOURCES_DIR, PRIVATE_KEY_ENV_VAR, SEPOLIA_RPC_URL_ENV_VAR,
    },
    errors::ScriptError,
};

/// The full project configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Solidity compiler settings
    pub solidity: SolidityConfig,
    /// Networks that can be deployed to, keyed by name
    pub networks: BTreeMap<String, NetworkConfig>,
    /// Source and artifact locations
    pub paths: PathsConfig,
}

/// Settings passed to the Solidity compiler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidityConfig {
    /// The compiler version, e.g. `0.8.28`
    pub version: String,
    /// Whether to compile through the Yul IR pipeline
    #[serde(rename = "viaIR")]
    pub via_ir: bool,
    /// Import remappings, e.g. `@openzeppelin/=node_modules/@openzeppelin/`
    pub remappings: Vec<String>,
    /// Optimizer settings
    pub optimizer: OptimizerConfig,
}

/// Solidity optimizer settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of times each opcode is expected to be executed
    pub runs: u32,
}

/// A network, described by the environment variables that hold its endpoint
/// and deployer key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The environment variable holding the RPC URL
    pub url_env: String,
    /// The environment variable holding the deployer's private key
    pub accounts_env: String,
}

/// Locations of the Solidity sources and their compilation artifacts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The directory containing the Solidity sources
    pub sources: PathBuf,
    /// The directory compilation artifacts are written to and read from
    pub artifacts: PathBuf,
    /// Directories searched for imported packages, e.g. `node_modules`
    pub libraries: Vec<PathBuf>,
}

/// A network whose endpoint and key have been read from the environment
#[derive(Clone)]
pub struct ResolvedNetwork {
    /// The name of the network
    pub name: String,
    /// The RPC URL of the network
    pub rpc_url: String,
    /// The deployer's private key
    pub private_key: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(DEFAULT_NETWORK.to_string(), NetworkConfig::sepolia());

        Self {
            solidity: SolidityConfig::default(),
            networks,
            paths: PathsConfig::default(),
        }
    }
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_SOLC_VERSION.to_string(),
            via_ir: true,
            remappings: Vec::new(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: PathBuf::from(DEFAULT_SOURCES_DIR),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            libraries: vec![PathBuf::from(DEFAULT_LIBRARIES_DIR)],
        }
    }
}

impl NetworkConfig {
    /// The Sepolia testnet, configured from `SEPOLIA_RPC_URL` and `PRIVATE_KEY`
    pub fn sepolia() -> Self {
        Self {
            url_env: SEPOLIA_RPC_URL_ENV_VAR.to_string(),
            accounts_env: PRIVATE_KEY_ENV_VAR.to_string(),
        }
    }
}

impl Debug for ResolvedNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedNetwork")
            .field("name", &self.name)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ProjectConfig {
    /// Load the configuration, reading overrides from the given TOML file if any
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        debug!("loading config from {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse the configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ScriptError> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| ScriptError::Config(e.to_string()))?;

        config
            .networks
            .entry(DEFAULT_NETWORK.to_string())
            .or_insert_with(NetworkConfig::sepolia);

        Ok(config)
    }

    /// Resolve the named network's endpoint and key.
    ///
    /// Explicit overrides take precedence over the network's environment variables.
    pub fn resolve_network(
        &self,
        name: &str,
        rpc_url: Option<String>,
        private_key: Option<String>,
    ) -> Result<ResolvedNetwork, ScriptError> {
        let network = self
            .networks
            .get(name)
            .ok_or_else(|| ScriptError::Config(format!("unknown network `{}`", name)))?;

        let rpc_url = match rpc_url {
            Some(url) => url,
            None => read_env_var(&network.url_env)?,
        };
        let private_key = match private_key {
            Some(key) => key,
            None => read_env_var(&network.accounts_env)?,
        };

        Ok(ResolvedNetwork {
            name: name.to_string(),
            rpc_url,
            private_key,
        })
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ScriptError> {
        toml::to_string_pretty(self).map_err(|e| ScriptError::Config(e.to_string()))
    }
}

/// Read a required, non-empty environment variable
fn read_env_var(name: &str) -> Result<String, ScriptError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ScriptError::Config(format!("environment variable {} is empty", name))),
        Err(_) => Err(ScriptError::Config(format!("environment variable {} is not set", name))),
    }
}

/// Load a `.env` file from the current directory or its ancestors, returning
/// its path if one exists
pub fn load_dotenv() -> Result<Option<PathBuf>, ScriptError> {
    dotenv_outcome(dotenvy::dotenv())
}

/// A missing `.env` file is not an error, a malformed one is
fn dotenv_outcome(res: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>, ScriptError> {
    match res {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ScriptError::Config(format!("error loading .env: {}", e))),
    }
}
