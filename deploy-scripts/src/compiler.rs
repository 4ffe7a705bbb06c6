//! Compiling the Solidity sources with `solc`'s standard JSON interface

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    artifacts::ContractArtifact,
    config::{OptimizerConfig, SolidityConfig},
    constants::{SOLC_ERROR_SEVERITY, SOLIDITY_EXTENSION},
    errors::ScriptError,
};

// ---------
// | Input |
// ---------

/// The standard JSON input accepted by `solc --standard-json`
#[derive(Debug, Serialize)]
pub struct SolcInput {
    /// Always `Solidity`
    pub language: &'static str,
    /// The sources to compile, keyed by source name
    pub sources: BTreeMap<String, SolcSource>,
    /// Compiler settings
    pub settings: SolcSettings,
}

/// A single source file
#[derive(Debug, Serialize)]
pub struct SolcSource {
    /// The file's contents
    pub content: String,
}

/// The settings section of the standard JSON input
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolcSettings {
    /// Optimizer settings
    pub optimizer: OptimizerConfig,
    /// Whether to compile through the Yul IR pipeline
    #[serde(rename = "viaIR")]
    pub via_ir: bool,
    /// Import remappings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remappings: Vec<String>,
    /// The outputs requested, per file and per contract
    pub output_selection: Value,
}

impl SolcInput {
    /// Build the compiler input for the given sources
    pub fn new(sources: BTreeMap<String, SolcSource>, config: &SolidityConfig) -> Self {
        let output_selection = serde_json::json!({
            "*": { "*": ["abi", "evm.bytecode.object"] }
        });

        Self {
            language: "Solidity",
            sources,
            settings: SolcSettings {
                optimizer: config.optimizer,
                via_ir: config.via_ir,
                remappings: config.remappings.clone(),
                output_selection,
            },
        }
    }
}

// ----------
// | Output |
// ----------

/// The standard JSON output of `solc`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SolcOutput {
    /// Errors and warnings emitted during compilation
    pub errors: Vec<SolcDiagnostic>,
    /// Compiled contracts, keyed by source name then contract name
    pub contracts: BTreeMap<String, BTreeMap<String, SolcContract>>,
}

/// An error or warning emitted by `solc`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolcDiagnostic {
    /// `error`, `warning` or `info`
    pub severity: String,
    /// The short message
    #[serde(default)]
    pub message: String,
    /// The message with source location, if any
    #[serde(default)]
    pub formatted_message: Option<String>,
}

/// A compiled contract in the output
#[derive(Debug, Deserialize)]
pub struct SolcContract {
    /// The contract's JSON ABI
    #[serde(default)]
    pub abi: Value,
    /// EVM outputs
    pub evm: SolcEvm,
}

/// The EVM section of a compiled contract
#[derive(Debug, Deserialize)]
pub struct SolcEvm {
    /// Creation bytecode
    pub bytecode: SolcBytecode,
}

/// Hex-encoded bytecode, without `0x` prefix
#[derive(Debug, Deserialize)]
pub struct SolcBytecode {
    /// The bytecode
    pub object: String,
}

impl SolcDiagnostic {
    /// The most descriptive rendering of the diagnostic
    pub fn render(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }

    /// Whether the diagnostic fails the compilation
    pub fn is_error(&self) -> bool {
        self.severity == SOLC_ERROR_SEVERITY
    }
}

impl SolcOutput {
    /// Convert the output into artifacts, failing if `solc` reported any errors.
    ///
    /// Warnings are logged.
    pub fn into_artifacts(self) -> Result<Vec<ContractArtifact>, ScriptError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.errors.iter().partition(|diag| diag.is_error());

        for warning in warnings {
            warn!("{}", warning.render().trim_end());
        }

        if !errors.is_empty() {
            let rendered: Vec<&str> = errors.iter().map(|e| e.render().trim_end()).collect();
            return Err(ScriptError::ContractCompilation(rendered.join("\n")));
        }

        let artifacts = self
            .contracts
            .into_iter()
            .flat_map(|(source_name, contracts)| {
                contracts.into_iter().map(move |(contract_name, contract)| {
                    ContractArtifact::new(
                        &contract_name,
                        &source_name,
                        contract.abi,
                        &contract.evm.bytecode.object,
                    )
                })
            })
            .collect();

        Ok(artifacts)
    }
}

// -----------
// | Sources |
// -----------

/// Collect every Solidity file under `sources_dir`, keyed by its path
/// relative to the parent of `sources_dir` with `/` separators
/// (e.g. `contracts/Vault.sol`)
pub fn collect_sources(sources_dir: &Path) -> Result<BTreeMap<String, SolcSource>, ScriptError> {
    let root = sources_dir.parent().unwrap_or_else(|| Path::new(""));
    let mut files = Vec::new();
    collect_solidity_files(sources_dir, &mut files)?;

    let mut sources = BTreeMap::new();
    for path in files {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let source_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let content = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ContractCompilation(format!("{}: {}", path.display(), e)))?;
        sources.insert(source_name, SolcSource { content });
    }

    if sources.is_empty() {
        return Err(ScriptError::ContractCompilation(format!(
            "no Solidity sources found under {}",
            sources_dir.display()
        )));
    }

    Ok(sources)
}

/// Recursively collect the `.sol` files under `dir`
fn collect_solidity_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ContractCompilation(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?
            .path();
        if path.is_dir() {
            collect_solidity_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == SOLIDITY_EXTENSION) {
            files.push(path);
        }
    }

    Ok(())
}

// -----------------
// | Invoking solc |
// -----------------

/// Build the `solc --standard-json` command.
///
/// Imports resolve against `base_path`, then against each of `include_paths`
/// that exists, so that `import "@openzeppelin/..."` finds installed packages.
pub fn solc_command(solc: &str, base_path: &Path, include_paths: &[PathBuf]) -> Command {
    let mut command = Command::new(solc);
    command.arg("--standard-json").arg("--base-path").arg(base_path);

    for path in include_paths.iter().filter(|path| path.is_dir()) {
        command.arg("--include-path").arg(path);
    }

    command
}

/// Run the given `solc` command on the given input
pub fn run_solc(mut command: Command, input: &SolcInput) -> Result<SolcOutput, ScriptError> {
    let solc = command.get_program().to_string_lossy().into_owned();
    let input_json =
        serde_json::to_vec(input).map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ScriptError::ContractCompilation(format!("failed to run {}: {}", solc, e)))?;

    // `stdin` is dropped at the end of the block, closing the pipe
    {
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ScriptError::ContractCompilation("could not open solc stdin".to_string())
        })?;
        stdin
            .write_all(&input_json)
            .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
    if !output.status.success() {
        return Err(ScriptError::ContractCompilation(format!(
            "{} exited with {}",
            solc, output.status
        )));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|e| ScriptError::ContractCompilation(format!("malformed solc output: {}", e)))
}

/// Query the version of the given `solc` binary
pub fn solc_version(solc: &str) -> Result<String, ScriptError> {
    let output = Command::new(solc)
        .arg("--version")
        .output()
        .map_err(|e| ScriptError::ContractCompilation(format!("failed to run {}: {}", solc, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_solc_version(&stdout).ok_or_else(|| {
        ScriptError::ContractCompilation(format!("could not parse version from {}", solc))
    })
}

/// Extract the semantic version from `solc --version` output, e.g. `0.8.28`
/// from `Version: 0.8.28+commit.7893614a.Linux.g++`
pub fn parse_solc_version(output: &str) -> Option<String> {
    let line = output.lines().find_map(|l| l.trim().strip_prefix("Version:"))?;
    let version = line.trim().split(['+', '-']).next()?.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Compile every source under `sources_dir` and write the resulting
/// artifacts under `artifacts_dir`, returning the written artifacts.
///
/// Packages are imported from `libraries`.
pub fn compile(
    solc: &str,
    sources_dir: &Path,
    artifacts_dir: &Path,
    libraries: &[PathBuf],
    config: &SolidityConfig,
) -> Result<Vec<ContractArtifact>, ScriptError> {
    match solc_version(solc) {
        Ok(version) if version != config.version => warn!(
            "{} is version {}, but the project is configured for {}",
            solc, version, config.version
        ),
        Ok(version) => debug!("using {} {}", solc, version),
        Err(e) => warn!("{}", e),
    }

    let sources = collect_sources(sources_dir)?;
    debug!("compiling {} source files", sources.len());

    let input = SolcInput::new(sources, config);
    let command = solc_command(solc, source_root(sources_dir), libraries);
    let artifacts = run_solc(command, &input)?.into_artifacts()?;

    write_artifacts(artifacts_dir, sources_dir, &artifacts)?;
    Ok(artifacts)
}

/// The directory source names are relative to: the parent of `sources_dir`
fn source_root(sources_dir: &Path) -> &Path {
    match sources_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Replace the artifacts previously compiled from `sources_dir` with the
/// given artifacts.
///
/// Artifacts of contracts whose sources were moved or deleted are removed, so
/// that every contract name resolves to a single artifact.
pub fn write_artifacts(
    artifacts_dir: &Path,
    sources_dir: &Path,
    artifacts: &[ContractArtifact],
) -> Result<(), ScriptError> {
    if let Some(dir_name) = sources_dir.file_name() {
        let previous = artifacts_dir.join(dir_name);
        if previous.is_dir() && !same_dir(&previous, sources_dir) {
            debug!("removing previous artifacts in {}", previous.display());
            fs::remove_dir_all(&previous).map_err(|e| {
                ScriptError::ContractCompilation(format!("{}: {}", previous.display(), e))
            })?;
        }
    }

    for artifact in artifacts {
        let path = artifact.write(artifacts_dir)?;
        debug!("wrote {}", path.display());
    }

    Ok(())
}

/// Whether two paths refer to the same existing directory
fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
