//! A JSON-RPC endpoint answering the calls made while deploying a contract

use alloy_primitives::{address, b256, Address, TxHash};
use deploy_scripts::config::ResolvedNetwork;
use httpmock::{prelude::*, Mock};
use serde_json::{json, Value};

use super::DEPLOYER;

/// The key `DEPLOYER` signs with
pub const DEPLOYER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The chain ID the endpoint reports
pub const CHAIN_ID: u64 = 31337;

/// The hash the endpoint assigns to any submitted transaction
pub const DEPLOY_TX_HASH: TxHash =
    b256!("21f6554c28453a01e7276c1db2fc1695bb512b170818bfa98fa8136433100616");

/// The address of the contract created by a successful deployment
pub const CREATED_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

/// Start an endpoint answering every call a deployment makes except
/// `eth_getTransactionReceipt`, which each test mocks itself
pub async fn start_rpc_stub() -> MockServer {
    let server = MockServer::start_async().await;

    let fee_history = json!({
        "oldestBlock": "0x1",
        "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
        "gasUsedRatio": [0.5],
        "reward": [["0x3b9aca00"]]
    });
    let results = [
        ("eth_chainId", json!(format!("{:#x}", CHAIN_ID))),
        ("eth_getTransactionCount", json!("0x0")),
        ("eth_estimateGas", json!("0x100000")),
        ("eth_gasPrice", json!("0x3b9aca00")),
        ("eth_maxPriorityFeePerGas", json!("0x3b9aca00")),
        ("eth_feeHistory", fee_history),
        ("eth_sendRawTransaction", json!(DEPLOY_TX_HASH)),
    ];
    for (method, result) in results {
        mock_rpc_method(&server, method, result).await;
    }

    server
}

/// Answer every call to `method` with the given result
pub async fn mock_rpc_method<'a>(server: &'a MockServer, method: &str, result: Value) -> Mock<'a> {
    let body = json!({ "jsonrpc": "2.0", "id": 0, "result": result });
    let method = format!("\"{}\"", method);

    server
        .mock_async(move |when, then| {
            when.method(POST).body_contains(method.as_str());
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body.clone());
        })
        .await
}

/// A receipt for the deployment transaction
pub fn receipt_json(success: bool, contract_address: Option<Address>) -> Value {
    json!({
        "transactionHash": DEPLOY_TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0x4acbdefb861ef4adedb135ca52865f6743451bfbfa35db78076f881a40401a5e",
        "blockNumber": "0x1",
        "from": DEPLOYER,
        "to": null,
        "contractAddress": contract_address,
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" }
    })
}

/// A network pointing at the given endpoint, signing with `DEPLOYER_KEY`
pub fn network_at(rpc_url: &str) -> ResolvedNetwork {
    ResolvedNetwork {
        name: "localhost".to_string(),
        rpc_url: rpc_url.to_string(),
        private_key: DEPLOYER_KEY.to_string(),
    }
}
