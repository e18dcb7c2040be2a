// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    primitives::{Address, U256},
    sol_types::Eip712Domain,
};
use async_trait::async_trait;
use quiz_fhevm::{
    CiphertextHandle, DecryptionSignature, EncryptedInput, EncryptedInputResult, FhevmError,
    FhevmInstance, HandleContractPair, Keypair, MockFhevmInstance,
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// A capability that reports itself as production while encrypting locally.
///
/// Drives the ciphertext submission path and the decrypt-and-verify flow without a relayer.
pub struct LocalFhevm {
    inner: MockFhevmInstance,
    decryptions: AtomicUsize,
    withhold_values: AtomicBool,
    fail_encryption: AtomicBool,
}

impl LocalFhevm {
    pub fn new(chain_id: u64, kms_verifier: Address) -> Self {
        Self {
            inner: MockFhevmInstance::new(chain_id, kms_verifier),
            decryptions: AtomicUsize::new(0),
            withhold_values: AtomicBool::new(false),
            fail_encryption: AtomicBool::new(false),
        }
    }

    pub fn decryption_count(&self) -> usize {
        self.decryptions.load(Ordering::SeqCst)
    }

    /// Decryption succeeds but returns no value for any handle
    pub fn withhold_values(&self) {
        self.withhold_values.store(true, Ordering::SeqCst);
    }

    pub fn fail_encryption(&self) {
        self.fail_encryption.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FhevmInstance for LocalFhevm {
    fn is_simulation(&self) -> bool {
        false
    }

    fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    async fn encrypt(&self, input: &EncryptedInput) -> Result<EncryptedInputResult, FhevmError> {
        if self.fail_encryption.load(Ordering::SeqCst) {
            return Err(FhevmError::Unavailable("coprocessor offline".to_string()));
        }
        self.inner.encrypt(input).await
    }

    fn generate_keypair(&self) -> Result<Keypair, FhevmError> {
        self.inner.generate_keypair()
    }

    fn eip712_domain(&self) -> Eip712Domain {
        self.inner.eip712_domain()
    }

    async fn user_decrypt(
        &self,
        pairs: &[HandleContractPair],
        signature: &DecryptionSignature,
    ) -> Result<HashMap<CiphertextHandle, U256>, FhevmError> {
        self.decryptions.fetch_add(1, Ordering::SeqCst);
        let values = self.inner.user_decrypt(pairs, signature).await?;
        if self.withhold_values.load(Ordering::SeqCst) {
            return Ok(HashMap::new());
        }
        Ok(values)
    }
}
