//! Scripts for compiling and deploying the project's Vault, MainProject and
//! GovernanceToken contracts.

#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod solidity;
pub mod utils;
