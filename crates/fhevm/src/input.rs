// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextHandle, FhevmError, FhevmInstance, ValidityProof};
use alloy::primitives::Address;
use tracing::debug;

/// Plaintext values waiting to be encrypted for a (contract, user) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    contract: Address,
    user: Address,
    values: Vec<u32>,
}

impl EncryptedInput {
    pub fn new(contract: Address, user: Address) -> Self {
        Self {
            contract,
            user,
            values: Vec::new(),
        }
    }

    pub fn add32(&mut self, value: u32) -> &mut Self {
        self.values.push(value);
        self
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn user(&self) -> Address {
        self.user
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

/// Wraps a single answer into a handle and its validity proof.
///
/// Holds no state: every call produces a fresh handle, even for identical input.
pub struct EncryptedInputBuilder;

impl EncryptedInputBuilder {
    pub async fn build(
        instance: &dyn FhevmInstance,
        contract: Address,
        user: Address,
        plaintext: u32,
    ) -> Result<(CiphertextHandle, ValidityProof), FhevmError> {
        let mut input = instance.create_encrypted_input(contract, user);
        input.add32(plaintext);

        let result = instance.encrypt(&input).await?;
        let Some(handle) = result.handles.first().copied() else {
            return Err(FhevmError::Encryption(
                "capability returned no handle".to_string(),
            ));
        };

        debug!(%contract, %user, %handle, "Encrypted input");
        Ok((handle, result.input_proof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockFhevmInstance;
    use alloy::primitives::address;

    const GAME: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[tokio::test]
    async fn test_build_returns_handle_and_proof() -> Result<(), FhevmError> {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let (handle, proof) = EncryptedInputBuilder::build(&instance, GAME, USER, 3).await?;
        assert_ne!(handle, CiphertextHandle::ZERO);
        assert!(!proof.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_handles_never_reused() -> Result<(), FhevmError> {
        let instance = MockFhevmInstance::new(31337, Address::ZERO);
        let (first, _) = EncryptedInputBuilder::build(&instance, GAME, USER, 1).await?;
        let (second, _) = EncryptedInputBuilder::build(&instance, GAME, USER, 1).await?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn test_add32_chains() {
        let mut input = EncryptedInput::new(GAME, USER);
        input.add32(1).add32(u32::MAX);
        assert_eq!(input.values(), &[1, u32::MAX]);
        assert_eq!(input.contract(), GAME);
        assert_eq!(input.user(), USER);
    }
}
