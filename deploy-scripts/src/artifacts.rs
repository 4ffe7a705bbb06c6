//! Reading and writing contract compilation artifacts.
//!
//! Artifacts follow the Hardhat layout: the artifact for contract `Name`
//! compiled from `contracts/Name.sol` lives at
//! `<artifacts>/contracts/Name.sol/Name.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{hex, Bytes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{ARTIFACT_FORMAT, JSON_EXTENSION},
    errors::ScriptError,
};

/// The marker solc leaves in bytecode that still needs library addresses linked in
const UNLINKED_LIBRARY_MARKER: &str = "__$";

/// A compiled contract: its ABI and creation bytecode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The artifact format tag
    #[serde(rename = "_format", default = "default_format")]
    pub format: String,
    /// The name of the contract
    pub contract_name: String,
    /// The path of the source file the contract was compiled from
    pub source_name: String,
    /// The contract's JSON ABI
    pub abi: Value,
    /// The hex-encoded creation bytecode
    pub bytecode: String,
}

fn default_format() -> String {
    ARTIFACT_FORMAT.to_string()
}

impl ContractArtifact {
    /// Construct an artifact from compiler output
    pub fn new(contract_name: &str, source_name: &str, abi: Value, bytecode: &str) -> Self {
        let bytecode = if bytecode.starts_with("0x") {
            bytecode.to_string()
        } else {
            format!("0x{}", bytecode)
        };

        Self {
            format: default_format(),
            contract_name: contract_name.to_string(),
            source_name: source_name.to_string(),
            abi,
            bytecode,
        }
    }

    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Read an artifact from the given file
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Write the artifact into the Hardhat layout under `artifacts_dir`,
    /// returning the path written to
    pub fn write(&self, artifacts_dir: &Path) -> Result<PathBuf, ScriptError> {
        let path = artifact_path(artifacts_dir, &self.source_name, &self.contract_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
        fs::write(&path, json).map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

        Ok(path)
    }

    /// Decode the contract's creation bytecode.
    ///
    /// Fails for abstract contracts and interfaces, which have no bytecode, and
    /// for bytecode with unlinked library references.
    pub fn creation_code(&self) -> Result<Bytes, ScriptError> {
        if self.bytecode.contains(UNLINKED_LIBRARY_MARKER) {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has unlinked library references",
                self.contract_name
            )));
        }

        let code = hex::decode(&self.bytecode)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", self.contract_name, e)))?;
        if code.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has no bytecode, is it abstract?",
                self.contract_name
            )));
        }

        Ok(code.into())
    }

    /// The ABI types of the constructor's inputs, empty if the ABI declares
    /// no constructor
    pub fn constructor_inputs(&self) -> Vec<String> {
        let inputs = self
            .abi
            .as_array()
            .and_then(|entries| entries.iter().find(|entry| entry["type"] == "constructor"))
            .and_then(|ctor| ctor["inputs"].as_array());

        inputs
            .into_iter()
            .flatten()
            .map(|input| input["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

/// The path of a contract's artifact within `artifacts_dir`
pub fn artifact_path(artifacts_dir: &Path, source_name: &str, contract_name: &str) -> PathBuf {
    artifacts_dir
        .join(source_name)
        .join(contract_name)
        .with_extension(JSON_EXTENSION)
}

/// Find and read the artifact of the named contract anywhere under `artifacts_dir`
pub fn find_artifact(
    artifacts_dir: &Path,
    contract_name: &str,
) -> Result<ContractArtifact, ScriptError> {
    let file_name = format!("{}.{}", contract_name, JSON_EXTENSION);
    let mut matches = Vec::new();
    collect_named_files(artifacts_dir, &file_name, &mut matches)?;

    match matches.as_slice() {
        [path] => ContractArtifact::read(path),
        [] => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for {} under {}, have the contracts been compiled?",
            contract_name,
            artifacts_dir.display()
        ))),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "multiple artifacts for {} under {}",
            contract_name,
            artifacts_dir.display()
        ))),
    }
}

/// Recursively collect all files under `dir` named `file_name`
fn collect_named_files(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();
        if path.is_dir() {
            collect_named_files(&path, file_name, matches)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            matches.push(path);
        }
    }

    Ok(())
}
