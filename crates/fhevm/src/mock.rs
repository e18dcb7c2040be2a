// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    decryption_domain, CiphertextHandle, DecryptionSignature, EncryptedInput,
    EncryptedInputResult, FhevmError, FhevmInstance, HandleContractPair, Keypair, ValidityProof,
};
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::Eip712Domain,
};
use async_trait::async_trait;
use rand::{thread_rng, RngCore};
use std::{collections::HashMap, sync::Mutex};
use tracing::debug;

const PROOF_LEN: usize = 64;
const KEY_LEN: usize = 32;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Local stand-in for the coprocessor.
///
/// Handles and proofs are random. Encrypted values are remembered so that a handle this instance
/// issued can be decrypted again; any other handle has no value.
pub struct MockFhevmInstance {
    chain_id: u64,
    kms_verifier: Address,
    values: Mutex<HashMap<CiphertextHandle, (Address, u32)>>,
}

impl MockFhevmInstance {
    pub fn new(chain_id: u64, kms_verifier: Address) -> Self {
        Self {
            chain_id,
            kms_verifier,
            values: Mutex::new(HashMap::new()),
        }
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<CiphertextHandle, (Address, u32)>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl FhevmInstance for MockFhevmInstance {
    fn is_simulation(&self) -> bool {
        true
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn encrypt(&self, input: &EncryptedInput) -> Result<EncryptedInputResult, FhevmError> {
        if input.values().is_empty() {
            return Err(FhevmError::InvalidInput("no values added".to_string()));
        }

        let mut values = self.values();
        let handles = input
            .values()
            .iter()
            .map(|value| {
                let handle = CiphertextHandle::from_slice(&random_bytes(32));
                values.insert(handle, (input.contract(), *value));
                handle
            })
            .collect();

        Ok(EncryptedInputResult {
            handles,
            input_proof: ValidityProof(Bytes::from(random_bytes(PROOF_LEN))),
        })
    }

    fn generate_keypair(&self) -> Result<Keypair, FhevmError> {
        Ok(Keypair {
            public_key: Bytes::from(random_bytes(KEY_LEN)),
            private_key: Bytes::from(random_bytes(KEY_LEN)),
        })
    }

    fn eip712_domain(&self) -> Eip712Domain {
        decryption_domain(self.chain_id, self.kms_verifier)
    }

    async fn user_decrypt(
        &self,
        pairs: &[HandleContractPair],
        signature: &DecryptionSignature,
    ) -> Result<HashMap<CiphertextHandle, U256>, FhevmError> {
        let contracts: Vec<Address> = pairs.iter().map(|p| p.contract_address).collect();
        if !signature.covers(&contracts) {
            return Err(FhevmError::Decryption(
                "signature does not cover the requested contracts".to_string(),
            ));
        }
        if signature.chain_id != self.chain_id {
            return Err(FhevmError::Decryption(format!(
                "signature was made for chain {}",
                signature.chain_id
            )));
        }

        let values = self.values();
        let decrypted: HashMap<_, _> = pairs
            .iter()
            .filter_map(|pair| match values.get(&pair.handle) {
                Some((contract, value)) if *contract == pair.contract_address => {
                    Some((pair.handle, U256::from(*value)))
                }
                _ => None,
            })
            .collect();

        debug!(
            requested = pairs.len(),
            decrypted = decrypted.len(),
            "Simulated user decryption"
        );
        Ok(decrypted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const GAME: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn grant(contracts: Vec<Address>) -> DecryptionSignature {
        DecryptionSignature {
            private_key: Bytes::new(),
            public_key: Bytes::new(),
            signature: Bytes::new(),
            contract_addresses: contracts,
            user_address: USER,
            chain_id: 31337,
            start_timestamp: 0,
            duration_days: 1,
        }
    }

    #[tokio::test]
    async fn test_round_trip() -> Result<(), FhevmError> {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let mut input = instance.create_encrypted_input(GAME, USER);
        input.add32(2).add32(7);

        let result = instance.encrypt(&input).await?;
        assert_eq!(result.handles.len(), 2);
        assert_eq!(result.input_proof.len(), PROOF_LEN);

        let pairs: Vec<_> = result
            .handles
            .iter()
            .map(|handle| HandleContractPair {
                handle: *handle,
                contract_address: GAME,
            })
            .collect();
        let values = instance.user_decrypt(&pairs, &grant(vec![GAME])).await?;
        assert_eq!(values.get(&result.handles[0]), Some(&U256::from(2)));
        assert_eq!(values.get(&result.handles[1]), Some(&U256::from(7)));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_handle_is_absent() -> Result<(), FhevmError> {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let pair = HandleContractPair {
            handle: CiphertextHandle::repeat_byte(9),
            contract_address: GAME,
        };
        let values = instance.user_decrypt(&[pair], &grant(vec![GAME])).await?;
        assert!(values.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_grant_must_cover_contract() {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let pair = HandleContractPair {
            handle: CiphertextHandle::repeat_byte(9),
            contract_address: GAME,
        };
        let result = instance.user_decrypt(&[pair], &grant(vec![])).await;
        assert!(matches!(result, Err(FhevmError::Decryption(_))));
    }

    #[tokio::test]
    async fn test_grant_from_other_chain_rejected() {
        let instance = MockFhevmInstance::new(11155111, Address::ZERO);
        let pair = HandleContractPair {
            handle: CiphertextHandle::repeat_byte(9),
            contract_address: GAME,
        };
        let result = instance.user_decrypt(&[pair], &grant(vec![GAME])).await;
        assert!(matches!(result, Err(FhevmError::Decryption(_))));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let input = instance.create_encrypted_input(GAME, USER);
        assert!(matches!(
            instance.encrypt(&input).await,
            Err(FhevmError::InvalidInput(_))
        ));
    }
}
