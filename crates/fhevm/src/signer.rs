// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FhevmError, UserDecryptRequestVerification};
use alloy::{
    primitives::{Address, Bytes},
    signers::{local::PrivateKeySigner, Signer},
    sol_types::{Eip712Domain, SolStruct},
};
use async_trait::async_trait;

/// The user's wallet as seen by the decryption flow
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Sign the typed-data grant. Returns the 65 byte `r || s || v` signature.
    async fn sign_decryption_request(
        &self,
        domain: &Eip712Domain,
        request: &UserDecryptRequestVerification,
    ) -> Result<Bytes, FhevmError>;
}

#[async_trait]
impl WalletSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        Signer::address(self)
    }

    async fn sign_decryption_request(
        &self,
        domain: &Eip712Domain,
        request: &UserDecryptRequestVerification,
    ) -> Result<Bytes, FhevmError> {
        let hash = request.eip712_signing_hash(domain);
        let signature = self
            .sign_hash(&hash)
            .await
            .map_err(|e| FhevmError::SignerRejected(e.to_string()))?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}
