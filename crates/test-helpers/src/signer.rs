// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    primitives::{Address, Bytes},
    signers::local::PrivateKeySigner,
    sol_types::Eip712Domain,
};
use async_trait::async_trait;
use quiz_fhevm::{FhevmError, UserDecryptRequestVerification, WalletSigner};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Wallet that counts signature prompts and can be told to refuse them
pub struct TestSigner {
    inner: PrivateKeySigner,
    prompts: AtomicUsize,
    reject: AtomicBool,
}

impl TestSigner {
    pub fn random() -> Self {
        Self {
            inner: PrivateKeySigner::random(),
            prompts: AtomicUsize::new(0),
            reject: AtomicBool::new(false),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn reject_all(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletSigner for TestSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign_decryption_request(
        &self,
        domain: &Eip712Domain,
        request: &UserDecryptRequestVerification,
    ) -> Result<Bytes, FhevmError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if self.reject.load(Ordering::SeqCst) {
            return Err(FhevmError::SignerRejected("user rejected the request".to_string()));
        }
        self.inner.sign_decryption_request(domain, request).await
    }
}
