// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Opaque 32 byte reference to an encrypted value held by a contract
pub type CiphertextHandle = B256;

/// Evidence that a set of handles was well formed when created. Consumed by one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityProof(pub Bytes);

impl ValidityProof {
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInputResult {
    pub handles: Vec<CiphertextHandle>,
    pub input_proof: ValidityProof,
}

/// Ephemeral keypair a decryption grant is issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypair {
    pub public_key: Bytes,
    pub private_key: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: CiphertextHandle,
    pub contract_address: Address,
}
