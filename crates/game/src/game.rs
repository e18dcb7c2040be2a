// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    LeaderboardAggregator, QuestionRegistry, QuizError, QuizReader, ReadSettings, SharedState,
    SubmissionRouter, SubmitOutcome, VerificationOrchestrator, VerificationOutcome,
};
use alloy::primitives::{Address, TxHash, U256};
use quiz_config::QuizConfig;
use quiz_evm::{AnswerGameWrite, QuizContracts};
use quiz_fhevm::{DecryptionSignatureCache, FhevmInstance, WalletSigner};
use quiz_storage::StringStorage;
use std::{fmt::Display, future::Future, sync::Arc};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub question_page: usize,
    pub answers_page: u64,
    pub leaderboard_kind: u8,
    pub leaderboard_limit: u64,
    pub decryption_days: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::from(&QuizConfig::default())
    }
}

impl From<&QuizConfig> for GameSettings {
    fn from(config: &QuizConfig) -> Self {
        Self {
            question_page: config.questions.page_size,
            answers_page: config.answers.page_size as u64,
            leaderboard_kind: config.leaderboard.kind,
            leaderboard_limit: config.leaderboard.limit,
            decryption_days: config.decryption.duration_days,
        }
    }
}

/// One player's view of the quiz on one chain.
///
/// Without a capability or signer the game is read-only: reads work, writes fail with
/// `NotReady` or `SignerUnavailable`.
pub struct QuizGame {
    chain_id: u64,
    signer: Option<Arc<dyn WalletSigner>>,
    contracts: QuizContracts,
    reader: Arc<QuizReader>,
    router: SubmissionRouter,
    verifier: Option<Arc<VerificationOrchestrator>>,
    state: SharedState,
}

impl QuizGame {
    pub fn new(
        chain_id: u64,
        settings: &GameSettings,
        contracts: QuizContracts,
        instance: Option<Arc<dyn FhevmInstance>>,
        signer: Option<Arc<dyn WalletSigner>>,
        storage: Arc<dyn StringStorage>,
        state: SharedState,
    ) -> Self {
        let reader = Arc::new(QuizReader::new(
            &contracts,
            QuestionRegistry::new(settings.question_page),
            LeaderboardAggregator::new(contracts.leaderboard.clone(), settings.leaderboard_kind),
            ReadSettings {
                answers_page: settings.answers_page,
                leaderboard_limit: settings.leaderboard_limit,
            },
            state.clone(),
        ));
        let signatures = Arc::new(DecryptionSignatureCache::new(
            storage,
            settings.decryption_days,
        ));
        let verifier = match (&instance, &signer) {
            (Some(instance), Some(signer)) => Some(Arc::new(VerificationOrchestrator::new(
                instance.clone(),
                signer.clone(),
                signatures,
                contracts.clone(),
                reader.clone(),
                state.clone(),
            ))),
            _ => None,
        };
        let router = SubmissionRouter::new(
            instance,
            signer.clone(),
            contracts.clone(),
            reader.clone(),
            verifier.clone(),
            state.clone(),
        );

        Self {
            chain_id,
            signer,
            contracts,
            reader,
            router,
            verifier,
            state,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn user(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    /// Reload questions and leaderboard if the state was last synced on another chain
    pub async fn sync_chain(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if state.last_chain == Some(self.chain_id) {
                return false;
            }
            state.last_chain = Some(self.chain_id);
        }
        info!(chain_id = self.chain_id, "Chain changed, reloading questions");
        self.load_questions().await;
        self.load_leaderboard().await;
        true
    }

    /// Reload stats and answers if the signer differs from the last synced one
    pub async fn sync_signer(&self) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        {
            let mut state = self.state.write().await;
            if state.last_signer == Some(user) {
                return false;
            }
            state.last_signer = Some(user);
        }
        self.load_user_stats().await;
        self.load_user_answers().await;
        true
    }

    pub async fn sync(&self) {
        self.sync_chain().await;
        self.sync_signer().await;
    }

    pub async fn load_questions(&self) {
        self.reader.load_questions().await;
    }

    pub async fn load_user_stats(&self) {
        if let Some(user) = self.user() {
            self.reader.load_user_stats(user).await;
        }
    }

    pub async fn load_user_answers(&self) {
        if let Some(user) = self.user() {
            self.reader.load_user_answers(user).await;
        }
    }

    pub async fn load_leaderboard(&self) {
        self.reader.load_leaderboard().await;
    }

    pub async fn token_balance(&self) -> U256 {
        match self.user() {
            Some(user) => self.reader.token_balance(user).await,
            None => U256::ZERO,
        }
    }

    pub async fn submit_answer(
        &self,
        question_id: u64,
        answer: u32,
    ) -> Result<SubmitOutcome, QuizError> {
        self.router.submit(question_id, answer).await
    }

    pub async fn wait_for_verifications(&self) -> Vec<Result<VerificationOutcome, QuizError>> {
        self.router.wait_for_verifications().await
    }

    pub fn pending_verifications(&self) -> usize {
        self.router.pending_verifications()
    }

    pub async fn decrypt_and_verify(
        &self,
        answer_index: u64,
    ) -> Result<VerificationOutcome, QuizError> {
        match &self.verifier {
            Some(verifier) => verifier.decrypt_and_verify(answer_index).await,
            None => {
                let err = QuizError::NotReady("encryption capability or signer missing".into());
                self.state.report(err.clone()).await;
                Err(err)
            }
        }
    }

    /// Send an already decrypted answer for verification
    pub async fn verify_answer(
        &self,
        answer_index: u64,
        decrypted_answer: u32,
    ) -> Result<TxHash, QuizError> {
        let tx = self
            .send(|writer| async move {
                writer.verify_answer(answer_index, decrypted_answer).await
            })
            .await?;
        self.load_user_answers().await;
        Ok(tx)
    }

    pub async fn reset_daily_limit(&self) -> Result<TxHash, QuizError> {
        self.send(|writer| async move { writer.reset_daily_limit().await })
            .await
    }

    /// Run a write call, then refresh the user's stats
    async fn send<F, Fut, E>(&self, call: F) -> Result<TxHash, QuizError>
    where
        F: FnOnce(Arc<dyn AnswerGameWrite>) -> Fut,
        Fut: Future<Output = Result<TxHash, E>>,
        E: Display,
    {
        let Some(writer) = self.contracts.game_writer.clone() else {
            let err = QuizError::SignerUnavailable("no wallet configured".to_string());
            self.state.report(err.clone()).await;
            return Err(err);
        };

        self.state.begin_loading().await;
        let result = call(writer).await.map_err(QuizError::rejected);
        self.state.end_loading().await;

        match result {
            Ok(tx) => {
                self.load_user_stats().await;
                Ok(tx)
            }
            Err(err) => {
                self.state.report(err.clone()).await;
                Err(err)
            }
        }
    }

    pub async fn reset_local_answers(&self) {
        self.state.write().await.answered.clear();
    }

    pub async fn can_answer(&self) -> bool {
        self.state.read().await.can_answer()
    }

    pub async fn accuracy(&self) -> f64 {
        self.state.read().await.accuracy()
    }
}
