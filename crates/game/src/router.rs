// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{QuizError, QuizReader, SharedState, VerificationOrchestrator, VerificationOutcome};
use alloy::primitives::TxHash;
use quiz_evm::{AnswerGameWrite, QuizContracts};
use quiz_fhevm::{EncryptedInputBuilder, FhevmInstance, WalletSigner};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    /// Local verdict against the loaded question
    pub ok: bool,
    /// `None` when the question was not among the loaded questions
    pub correct_answer: Option<u32>,
    pub tx: TxHash,
}

type VerificationTask = JoinHandle<Result<VerificationOutcome, QuizError>>;

/// Sends answers either as ciphertext with a validity proof or, on a simulation capability,
/// through the plaintext entrypoint. Production submissions start a background verification.
pub struct SubmissionRouter {
    instance: Option<Arc<dyn FhevmInstance>>,
    signer: Option<Arc<dyn WalletSigner>>,
    contracts: QuizContracts,
    reader: Arc<QuizReader>,
    verifier: Option<Arc<VerificationOrchestrator>>,
    state: SharedState,
    pending: Mutex<Vec<VerificationTask>>,
}

impl SubmissionRouter {
    pub fn new(
        instance: Option<Arc<dyn FhevmInstance>>,
        signer: Option<Arc<dyn WalletSigner>>,
        contracts: QuizContracts,
        reader: Arc<QuizReader>,
        verifier: Option<Arc<VerificationOrchestrator>>,
        state: SharedState,
    ) -> Self {
        Self {
            instance,
            signer,
            contracts,
            reader,
            verifier,
            state,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Submit `answer` for `question_id`.
    ///
    /// Returns once the submission is mined, without waiting for verification.
    pub async fn submit(&self, question_id: u64, answer: u32) -> Result<SubmitOutcome, QuizError> {
        self.state.begin_loading().await;
        let result = self.dispatch(question_id, answer).await;
        self.state.end_loading().await;

        if let Err(err) = &result {
            self.state.report(err.clone()).await;
        }
        result
    }

    async fn dispatch(&self, question_id: u64, answer: u32) -> Result<SubmitOutcome, QuizError> {
        let (Some(instance), Some(signer)) = (&self.instance, &self.signer) else {
            return Err(QuizError::NotReady(
                "encryption capability or signer missing".to_string(),
            ));
        };
        let writer = self.writer()?;
        let game = self.contracts.game.address();
        let user = signer.address();

        let (handle, proof) = EncryptedInputBuilder::build(instance.as_ref(), game, user, answer)
            .await
            .map_err(|e| QuizError::EncryptionFailure(e.to_string()))?;

        let simulation = instance.is_simulation();
        let tx = if simulation {
            writer.submit_answer_mock(question_id, answer).await
        } else {
            writer
                .submit_answer(question_id, handle, proof.into_bytes())
                .await
        }
        .map_err(QuizError::rejected)?;

        // a repeat submission reports the verdict already on record
        let (ok, correct_answer) = {
            let mut state = self.state.write().await;
            let correct_answer = state.correct_answer(question_id);
            let mark = state.mark_answered(question_id, correct_answer == Some(answer));
            (mark.ok, correct_answer)
        };
        info!(question_id, simulation, ok, %tx, "Answer submitted");

        self.reader.load_user_stats(user).await;
        self.reader.load_user_answers(user).await;

        if !simulation {
            self.spawn_verification();
        }

        Ok(SubmitOutcome {
            ok,
            correct_answer,
            tx,
        })
    }

    fn writer(&self) -> Result<&Arc<dyn AnswerGameWrite>, QuizError> {
        self.contracts
            .game_writer
            .as_ref()
            .ok_or_else(|| QuizError::SignerUnavailable("no wallet to send answers".to_string()))
    }

    fn spawn_verification(&self) {
        let Some(verifier) = self.verifier.clone() else {
            warn!("Production submission without a verifier, answer stays pending");
            return;
        };
        let task = tokio::spawn(async move { verifier.verify_latest().await });
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // finished verifications already reported their errors through the shared state
        pending.retain(|task| !task.is_finished());
        pending.push(task);
    }

    /// Verification tasks still tracked. Finished ones are dropped on the next submission.
    pub fn pending_verifications(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Wait for every verification that is still tracked
    pub async fn wait_for_verifications(&self) -> Vec<Result<VerificationOutcome, QuizError>> {
        let tasks: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            outcomes.push(match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(QuizError::DecryptionFailure(format!(
                    "verification task aborted: {err}"
                ))),
            });
        }
        outcomes
    }
}
