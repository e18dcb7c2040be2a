// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{LeaderboardAggregator, QuestionRegistry, QuizError, SharedState};
use alloy::primitives::{Address, U256};
use quiz_evm::{AnswerGameRead, Question, QuizContracts, TokenRead};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `getUserAnswers` limit used to find the newest answer index
const ALL_ANSWERS: u64 = 9999;

#[derive(Debug, Clone, Copy)]
pub struct ReadSettings {
    pub answers_page: u64,
    pub leaderboard_limit: u64,
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self {
            answers_page: 10,
            leaderboard_limit: 10,
        }
    }
}

/// Read paths that refresh [`SharedState`].
///
/// A failed read never propagates. Questions report into the error slot, everything else is
/// logged and left as it was.
pub struct QuizReader {
    game: Arc<dyn AnswerGameRead>,
    token: Option<Arc<dyn TokenRead>>,
    registry: QuestionRegistry,
    leaderboard: LeaderboardAggregator,
    settings: ReadSettings,
    state: SharedState,
}

impl QuizReader {
    pub fn new(
        contracts: &QuizContracts,
        registry: QuestionRegistry,
        leaderboard: LeaderboardAggregator,
        settings: ReadSettings,
        state: SharedState,
    ) -> Self {
        Self {
            game: contracts.game.clone(),
            token: contracts.token.clone(),
            registry,
            leaderboard,
            settings,
            state,
        }
    }

    async fn game_deployed(&self) -> Result<bool, QuizError> {
        let deployed = self.game.has_code().await.map_err(QuizError::read)?;
        if !deployed {
            warn!(game = %self.game.address(), "No contract code at game address");
        }
        Ok(deployed)
    }

    pub async fn load_questions(&self) {
        self.state.begin_loading().await;
        match self.fetch_questions().await {
            Ok(questions) => {
                info!(count = questions.len(), "Loaded questions");
                self.state.write().await.questions = questions;
            }
            Err(err) => self.state.report(err).await,
        }
        self.state.end_loading().await;
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, QuizError> {
        if !self.game_deployed().await? {
            return Err(QuizError::ChainRead(format!(
                "no contract code at {}",
                self.game.address()
            )));
        }

        let total = self.game.question_count().await.map_err(QuizError::read)?;
        let mut raw = Vec::new();
        for id in 0..total {
            match self.game.get_question(id).await {
                Ok(question) => raw.push(question),
                Err(err) => debug!(question_id = id, "Skipping unreadable question: {err}"),
            }
        }
        Ok(self.registry.normalize(raw))
    }

    pub async fn load_user_stats(&self, user: Address) {
        match self.game_deployed().await {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                warn!(%user, "Failed to load user stats: {err}");
                return;
            }
        }
        match self.game.get_user_stats(user).await {
            Ok(stats) => self.state.write().await.user_stats = Some(stats),
            Err(err) => warn!(%user, "Failed to load user stats: {err:#}"),
        }
    }

    pub async fn load_user_answers(&self, user: Address) {
        match self.game_deployed().await {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                warn!(%user, "Failed to load user answers: {err}");
                return;
            }
        }
        match self
            .game
            .get_user_answers(user, 0, self.settings.answers_page)
            .await
        {
            Ok(answers) => self.state.write().await.user_answers = answers,
            Err(err) => warn!(%user, "Failed to load user answers: {err:#}"),
        }
    }

    pub async fn load_leaderboard(&self) {
        match self
            .leaderboard
            .fetch(0, self.settings.leaderboard_limit)
            .await
        {
            Ok(entries) => self.state.write().await.leaderboard = entries,
            Err(err) => warn!("Failed to load leaderboard: {err}"),
        }
    }

    /// Reward token balance, zero when it cannot be read
    pub async fn token_balance(&self, user: Address) -> U256 {
        let Some(token) = &self.token else {
            return U256::ZERO;
        };
        match token.balance_of(user).await {
            Ok(balance) => balance,
            Err(err) => {
                warn!(%user, "Failed to get token balance: {err:#}");
                U256::ZERO
            }
        }
    }

    /// Index of the user's newest answer, 0 when there is none
    pub async fn latest_answer_index(&self, user: Address) -> Result<u64, QuizError> {
        let answers = self
            .game
            .get_user_answers(user, 0, ALL_ANSWERS)
            .await
            .map_err(QuizError::read)?;
        Ok((answers.len() as u64).saturating_sub(1))
    }
}
