// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    CiphertextHandle, DecryptionSignature, EncryptedInput, EncryptedInputResult, FhevmError,
    HandleContractPair, Keypair,
};
use alloy::{
    primitives::{Address, U256},
    sol_types::Eip712Domain,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// The encryption capability.
///
/// Callers never branch on the concrete backend; `is_simulation` is the only signal that the
/// plaintext submission path must be used instead of the ciphertext one.
#[async_trait]
pub trait FhevmInstance: Send + Sync {
    /// True for a local stand-in that is not backed by a real coprocessor
    fn is_simulation(&self) -> bool;

    fn chain_id(&self) -> u64;

    fn create_encrypted_input(&self, contract: Address, user: Address) -> EncryptedInput {
        EncryptedInput::new(contract, user)
    }

    async fn encrypt(&self, input: &EncryptedInput) -> Result<EncryptedInputResult, FhevmError>;

    fn generate_keypair(&self) -> Result<Keypair, FhevmError>;

    /// Domain the decryption grant is signed under
    fn eip712_domain(&self) -> Eip712Domain;

    /// Decrypt `pairs` under `signature`. Handles the capability has no value for are absent from
    /// the result.
    async fn user_decrypt(
        &self,
        pairs: &[HandleContractPair],
        signature: &DecryptionSignature,
    ) -> Result<HashMap<CiphertextHandle, U256>, FhevmError>;
}
