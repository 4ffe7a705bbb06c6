mod common;

use std::fs;

use common::{constructor_abi, write_artifact, write_project_artifacts, VAULT_CODE};
use deploy_scripts::{
    artifacts::{artifact_path, find_artifact, ContractArtifact},
    commands::init_code,
    compiler::{collect_sources, write_artifacts},
    errors::ScriptError,
    solidity::DeployTarget,
};
use eyre::Result;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_written_artifact_is_found() -> Result<()> {
    let dir = tempdir()?;
    write_project_artifacts(dir.path());

    assert!(artifact_path(dir.path(), "contracts/Vault.sol", "Vault").exists());

    let vault = find_artifact(dir.path(), "Vault")?;
    assert_eq!(vault.contract_name, "Vault");
    assert_eq!(vault.creation_code()?.as_ref(), &VAULT_CODE);
    assert_eq!(vault.constructor_inputs(), ["address"]);

    Ok(())
}

#[test]
fn test_duplicate_artifacts_rejected() -> Result<()> {
    let dir = tempdir()?;
    write_artifact(dir.path(), "Vault", constructor_abi(&["stablecoin"]), &VAULT_CODE);

    // A second `Vault` compiled from a different source file
    let other = dir.path().join("contracts/legacy/Vault.sol");
    fs::create_dir_all(&other)?;
    fs::copy(
        artifact_path(dir.path(), "contracts/Vault.sol", "Vault"),
        other.join("Vault.json"),
    )?;

    let err = find_artifact(dir.path(), "Vault").unwrap_err();
    assert!(err.to_string().contains("multiple"));
    Ok(())
}

#[test]
fn test_missing_artifacts_dir() {
    let err = find_artifact(std::path::Path::new("does/not/exist"), "Vault").unwrap_err();
    assert!(matches!(err, ScriptError::ArtifactParsing(_)));
}

#[test]
fn test_init_code_appends_args() -> Result<()> {
    let dir = tempdir()?;
    write_project_artifacts(dir.path());
    let addresses = common::test_addresses();

    let artifact = find_artifact(dir.path(), "GovernanceToken")?;
    let code = init_code(DeployTarget::GovernanceToken, &artifact, &addresses)?;

    assert_eq!(code.len(), 2 + 64);
    assert_eq!(&code[2 + 12..2 + 32], addresses.team.as_slice());
    assert_eq!(&code[2 + 44..], addresses.investor.as_slice());
    Ok(())
}

#[test]
fn test_collect_sources() -> Result<()> {
    let dir = tempdir()?;
    let contracts = dir.path().join("contracts");
    fs::create_dir_all(contracts.join("token"))?;
    fs::write(contracts.join("Vault.sol"), "contract Vault {}")?;
    fs::write(contracts.join("MainProject.sol"), "contract MainProject {}")?;
    fs::write(
        contracts.join("token").join("GovernanceToken.sol"),
        "contract GovernanceToken {}",
    )?;
    fs::write(contracts.join("README.md"), "not solidity")?;

    let sources = collect_sources(&contracts)?;
    let names: Vec<&str> = sources.keys().map(String::as_str).collect();

    assert_eq!(
        names,
        [
            "contracts/MainProject.sol",
            "contracts/Vault.sol",
            "contracts/token/GovernanceToken.sol"
        ]
    );
    assert_eq!(sources["contracts/Vault.sol"].content, "contract Vault {}");
    Ok(())
}

#[test]
fn test_collect_sources_empty() -> Result<()> {
    let dir = tempdir()?;
    let err = collect_sources(dir.path()).unwrap_err();
    assert!(matches!(err, ScriptError::ContractCompilation(_)));
    Ok(())
}

#[test]
fn test_recompile_removes_moved_sources() -> Result<()> {
    let dir = tempdir()?;
    let sources = dir.path().join("contracts");
    let artifacts = dir.path().join("artifacts");
    fs::create_dir_all(&sources)?;
    fs::write(sources.join("Vault.sol"), "contract Vault {}")?;

    // `Vault` used to live in `contracts/legacy/Vault.sol`
    let abi = constructor_abi(&["stablecoin"]);
    ContractArtifact::new("Vault", "contracts/legacy/Vault.sol", abi.clone(), "aa01")
        .write(&artifacts)?;

    let fresh = ContractArtifact::new("Vault", "contracts/Vault.sol", abi, "aa02");
    write_artifacts(&artifacts, &sources, &[fresh.clone()])?;

    assert!(!artifact_path(&artifacts, "contracts/legacy/Vault.sol", "Vault").exists());
    assert_eq!(find_artifact(&artifacts, "Vault")?, fresh);
    Ok(())
}

#[test]
fn test_write_artifacts_keeps_sources_in_artifacts_dir() -> Result<()> {
    let dir = tempdir()?;
    let sources = dir.path().join("contracts");
    fs::create_dir_all(&sources)?;
    fs::write(sources.join("Vault.sol"), "contract Vault {}")?;

    // Artifacts written alongside the sources must not remove them
    let token = ContractArtifact::new("Token", "contracts/token/Token.sol", json!([]), "aa01");
    write_artifacts(dir.path(), &sources, &[token])?;

    assert!(sources.join("Vault.sol").exists());
    assert!(find_artifact(dir.path(), "Token").is_ok());
    Ok(())
}
