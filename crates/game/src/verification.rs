// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{QuizError, QuizReader, SharedState};
use alloy::primitives::TxHash;
use quiz_evm::QuizContracts;
use quiz_fhevm::{DecryptionSignatureCache, FhevmInstance, HandleContractPair, WalletSigner};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Simulation capability: the plaintext entrypoint already judged the answer
    Skipped,
    Verified {
        answer_index: u64,
        plaintext: u32,
        tx: TxHash,
    },
}

/// Decrypts a stored answer under a decryption grant and hands the plaintext to the contract.
///
/// Correctness is decided on chain; this only moves the decrypted value there.
pub struct VerificationOrchestrator {
    instance: Arc<dyn FhevmInstance>,
    signer: Arc<dyn WalletSigner>,
    signatures: Arc<DecryptionSignatureCache>,
    contracts: QuizContracts,
    reader: Arc<QuizReader>,
    state: SharedState,
}

impl VerificationOrchestrator {
    pub fn new(
        instance: Arc<dyn FhevmInstance>,
        signer: Arc<dyn WalletSigner>,
        signatures: Arc<DecryptionSignatureCache>,
        contracts: QuizContracts,
        reader: Arc<QuizReader>,
        state: SharedState,
    ) -> Self {
        Self {
            instance,
            signer,
            signatures,
            contracts,
            reader,
            state,
        }
    }

    /// Decrypt and verify the answer at `answer_index`. Failures are reported to the error slot.
    pub async fn decrypt_and_verify(
        &self,
        answer_index: u64,
    ) -> Result<VerificationOutcome, QuizError> {
        let result = self.run(answer_index).await;
        if let Err(err) = &result {
            self.state.report(err.clone()).await;
        }
        result
    }

    /// [`Self::decrypt_and_verify`] for the signer's newest answer
    pub async fn verify_latest(&self) -> Result<VerificationOutcome, QuizError> {
        if self.instance.is_simulation() {
            return Ok(VerificationOutcome::Skipped);
        }
        let user = self.signer.address();
        match self.reader.latest_answer_index(user).await {
            Ok(answer_index) => self.decrypt_and_verify(answer_index).await,
            Err(err) => {
                self.state.report(err.clone()).await;
                Err(err)
            }
        }
    }

    async fn run(&self, answer_index: u64) -> Result<VerificationOutcome, QuizError> {
        if self.instance.is_simulation() {
            debug!(answer_index, "Simulation capability, skipping verification");
            return Ok(VerificationOutcome::Skipped);
        }

        let writer = self.contracts.game_writer.as_ref().ok_or_else(|| {
            QuizError::SignerUnavailable("no wallet to send verifyAnswer".to_string())
        })?;
        let game = self.contracts.game.address();
        let user = self.signer.address();

        let grant = self
            .signatures
            .load_or_sign(self.instance.as_ref(), &[game], self.signer.as_ref())
            .await
            .map_err(|e| QuizError::AuthorizationUnavailable(e.to_string()))?;

        let handle = self
            .contracts
            .game
            .get_encrypted_answer(user, answer_index)
            .await
            .map_err(QuizError::read)?;

        let pair = HandleContractPair {
            handle,
            contract_address: game,
        };
        let values = self
            .instance
            .user_decrypt(&[pair], &grant)
            .await
            .map_err(|e| QuizError::DecryptionFailure(e.to_string()))?;

        let value = values.get(&handle).ok_or_else(|| {
            QuizError::DecryptionFailure(format!("no value returned for handle {handle}"))
        })?;
        let plaintext = u32::try_from(*value).map_err(|_| {
            QuizError::DecryptionFailure(format!("decrypted value {value} exceeds 32 bits"))
        })?;

        let tx = writer
            .verify_answer(answer_index, plaintext)
            .await
            .map_err(QuizError::rejected)?;
        info!(answer_index, %tx, "Answer verified");

        self.reader.load_user_stats(user).await;
        self.reader.load_user_answers(user).await;

        Ok(VerificationOutcome::Verified {
            answer_index,
            plaintext,
            tx,
        })
    }
}
