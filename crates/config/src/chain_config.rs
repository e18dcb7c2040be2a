// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{contract::ContractAddresses, rpc::RPC};
use alloy_primitives::{address, Address};
use anyhow::*;
use serde::{Deserialize, Serialize};

pub const HARDHAT_CHAIN_ID: u64 = 31337;
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// How the encryption capability is provided on a chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum FhevmMode {
    /// Local stand-in. Submissions go through the plaintext entrypoint.
    Simulation,
    /// Production relayer reachable over http(s)
    Relayer { url: String },
}

impl Default for FhevmMode {
    fn default() -> Self {
        FhevmMode::Simulation
    }
}

/// BFV parameter set used for input encryption and ephemeral decryption keys
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BfvConfig {
    pub degree: usize,
    pub plaintext_modulus: u64,
    pub moduli: Vec<u64>,
}

impl Default for BfvConfig {
    fn default() -> Self {
        Self {
            degree: 2048,
            plaintext_modulus: 1032193,
            moduli: vec![0x3FFFFFFF000001],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FhevmConfig {
    #[serde(default)]
    pub mode: FhevmMode,
    /// Access-control authority. Public key material is cached under this address.
    pub acl: Address,
    /// Verifying contract for the decryption typed-data domain
    pub kms_verifier: Address,
    pub input_verifier: Address,
    pub gateway_chain_id: u64,
    #[serde(default)]
    pub bfv: BfvConfig,
}

impl FhevmConfig {
    pub fn is_simulation(&self) -> bool {
        matches!(self.mode, FhevmMode::Simulation)
    }

    /// Addresses used by the hardhat mock coprocessor
    pub fn hardhat() -> Self {
        Self {
            mode: FhevmMode::Simulation,
            acl: address!("50157CFfD6bBFA2DECe204a89ec419c23ef5755D"),
            kms_verifier: address!("901F8942346f7AB3a01F6D7613119Bca447Bb030"),
            input_verifier: address!("36772142b74871f255CbD7A3e89B401d3e45825f"),
            gateway_chain_id: 55815,
            bfv: BfvConfig::default(),
        }
    }

    pub fn sepolia() -> Self {
        Self {
            mode: FhevmMode::Relayer {
                url: "https://relayer.testnet.zama.cloud".to_string(),
            },
            acl: address!("687820221192C5B662b25367F70076A37bc79b6c"),
            kms_verifier: address!("1364cBBf2cDF5032C47d8226a6f6FBD2AFCDacAC"),
            input_verifier: address!("bc91f3daD1A5F19F8390c400196e58073B6a0BC4"),
            gateway_chain_id: 55815,
            bfv: BfvConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub contracts: ContractAddresses,
    pub fhevm: FhevmConfig,
}

impl ChainConfig {
    pub fn rpc_url(&self) -> Result<RPC> {
        Ok(RPC::from_url(&self.rpc_url)
            .map_err(|e| anyhow!("Failed to parse RPC URL for chain {}: {}", self.name, e))?)
    }

    pub fn hardhat() -> Self {
        Self {
            name: "hardhat".to_string(),
            chain_id: HARDHAT_CHAIN_ID,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contracts: ContractAddresses {
                answer_game: address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
                answer_token: Some(address!("5FbDB2315678afecb367f032d93F642f64180aa3")),
                leaderboard: Some(address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")),
            },
            fhevm: FhevmConfig::hardhat(),
        }
    }

    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            rpc_url: "https://ethereum-sepolia.publicnode.com".to_string(),
            contracts: ContractAddresses {
                answer_game: address!("B033734707ee59ca64749B44013F0A561078B4d7"),
                answer_token: Some(address!("054b4E292323412d74Df02Bd3ad773f2C97ec220")),
                leaderboard: Some(address!("7001469CDb36FAf11946C076aaef460b3BcF552C")),
            },
            fhevm: FhevmConfig::sepolia(),
        }
    }
}
