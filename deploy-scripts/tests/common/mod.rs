//! Helpers shared by the deploy script tests

#![allow(dead_code)]

pub mod rpc;

use std::{path::Path, sync::Mutex};

use alloy_primitives::{address, Address, Bytes};
use deploy_scripts::{
    artifacts::ContractArtifact, deployer::ContractDeployer, errors::ScriptError,
    solidity::ConstructorAddresses,
};
use serde_json::{json, Value};

/// The address the mock deployer signs with
pub const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Creation bytecode of the `Vault` fixture
pub const VAULT_CODE: [u8; 2] = [0xaa, 0x01];
/// Creation bytecode of the `MainProject` fixture
pub const MAIN_PROJECT_CODE: [u8; 2] = [0xbb, 0x02];
/// Creation bytecode of the `GovernanceToken` fixture
pub const GOVERNANCE_TOKEN_CODE: [u8; 2] = [0xcc, 0x03];

/// Distinct constructor addresses, so that argument order is observable
pub fn test_addresses() -> ConstructorAddresses {
    ConstructorAddresses {
        stablecoin: address!("1111111111111111111111111111111111111111"),
        team: address!("2222222222222222222222222222222222222222"),
        investor: address!("3333333333333333333333333333333333333333"),
    }
}

/// Left-pad an address into a 32-byte ABI word
pub fn abi_word(addr: Address) -> Vec<u8> {
    let mut word = vec![0u8; 12];
    word.extend_from_slice(addr.as_slice());
    word
}

/// An ABI containing only a constructor with the given `address` inputs
pub fn constructor_abi(inputs: &[&str]) -> Value {
    let inputs: Vec<Value> = inputs
        .iter()
        .map(|name| json!({ "name": name, "type": "address", "internalType": "address" }))
        .collect();

    json!([{ "type": "constructor", "inputs": inputs, "stateMutability": "nonpayable" }])
}

/// Write an artifact for the named contract under `dir`
pub fn write_artifact(dir: &Path, name: &str, abi: Value, code: &[u8]) {
    let bytecode = alloy_primitives::hex::encode(code);
    ContractArtifact::new(name, &format!("contracts/{}.sol", name), abi, &bytecode)
        .write(dir)
        .unwrap();
}

/// Write artifacts for all three contracts under `dir`
pub fn write_project_artifacts(dir: &Path) {
    write_artifact(dir, "Vault", constructor_abi(&["stablecoin"]), &VAULT_CODE);
    write_artifact(dir, "MainProject", json!([]), &MAIN_PROJECT_CODE);
    write_artifact(
        dir,
        "GovernanceToken",
        constructor_abi(&["team", "investor"]),
        &GOVERNANCE_TOKEN_CODE,
    );
}

/// A deployer recording the init code of every deployment it is asked to make
pub struct MockDeployer {
    /// The index of the deployment to reject, if any
    fail_at: Option<usize>,
    /// The init code of each deployment attempted, in order
    sent: Mutex<Vec<Bytes>>,
}

impl MockDeployer {
    /// A deployer that accepts every deployment
    pub fn new() -> Self {
        Self {
            fail_at: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A deployer that rejects the deployment at the given index
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    /// The init code of each deployment attempted so far
    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    /// The address the mock assigns to the deployment at `index`
    pub fn address_at(index: usize) -> Address {
        Address::with_last_byte(index as u8 + 1)
    }
}

impl ContractDeployer for MockDeployer {
    fn deployer_address(&self) -> Address {
        DEPLOYER
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Address, ScriptError> {
        let index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(init_code);
            sent.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(ScriptError::ContractDeployment(
                "insufficient funds for gas * price + value".to_string(),
            ));
        }

        Ok(Self::address_at(index))
    }
}
