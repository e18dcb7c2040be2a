// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::QuizError;
use alloy::primitives::Address;
use quiz_evm::{AnswerRecord, LeaderboardEntry, Question, UserStats};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::error;

/// Answers a user may submit per day
pub const DAILY_ANSWER_LIMIT: u64 = 10;

/// Locally derived result of answering a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerMark {
    pub ok: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub questions: Vec<Question>,
    pub user_stats: Option<UserStats>,
    pub user_answers: Vec<AnswerRecord>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub answered: BTreeMap<u64, AnswerMark>,
    /// Last surfaced failure
    pub error: Option<QuizError>,
    pub(crate) loading: usize,
    pub(crate) last_chain: Option<u64>,
    pub(crate) last_signer: Option<Address>,
}

impl GameState {
    /// Record the local verdict for `question_id`. The first mark for a question is kept.
    pub fn mark_answered(&mut self, question_id: u64, ok: bool) -> AnswerMark {
        *self
            .answered
            .entry(question_id)
            .or_insert(AnswerMark { ok })
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// False until the user's stats are loaded
    pub fn can_answer(&self) -> bool {
        self.user_stats
            .as_ref()
            .map(|s| s.daily_answers < DAILY_ANSWER_LIMIT)
            .unwrap_or(false)
    }

    /// Percentage of answered questions that were correct
    pub fn accuracy(&self) -> f64 {
        match &self.user_stats {
            Some(stats) if stats.total_answered > 0 => {
                stats.correct_answers as f64 / stats.total_answered as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn correct_answer(&self, question_id: u64) -> Option<u32> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| q.correct_answer)
    }
}

/// Game state shared between the facade and background verification tasks
#[derive(Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<GameState>>,
}

impl SharedState {
    pub async fn snapshot(&self) -> GameState {
        self.inner.read().await.clone()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, GameState> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, GameState> {
        self.inner.write().await
    }

    /// Log `err` with its kind and place it in the error slot
    pub async fn report(&self, err: QuizError) {
        error!(kind = err.kind(), "{err}");
        self.inner.write().await.error = Some(err);
    }

    pub async fn clear_error(&self) {
        self.inner.write().await.error = None;
    }

    pub(crate) async fn begin_loading(&self) {
        self.inner.write().await.loading += 1;
    }

    pub(crate) async fn end_loading(&self) {
        let mut state = self.inner.write().await;
        state.loading = state.loading.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn stats(total: u64, correct: u64, daily: u64) -> UserStats {
        UserStats {
            total_answered: total,
            correct_answers: correct,
            total_reward: U256::from(correct * 10),
            daily_answers: daily,
            last_answer_date: 0,
        }
    }

    #[test]
    fn test_first_mark_wins() {
        let mut state = GameState::default();
        assert_eq!(state.mark_answered(0, true), AnswerMark { ok: true });
        assert_eq!(state.mark_answered(0, false), AnswerMark { ok: true });
        assert_eq!(state.answered.get(&0), Some(&AnswerMark { ok: true }));
    }

    #[test]
    fn test_accuracy_and_daily_limit() {
        let mut state = GameState::default();
        assert_eq!(state.accuracy(), 0.0);

        state.user_stats = Some(stats(4, 3, 9));
        assert_eq!(state.accuracy(), 75.0);
        assert!(state.can_answer());

        state.user_stats = Some(stats(10, 0, 10));
        assert_eq!(state.accuracy(), 0.0);
        assert!(!state.can_answer());
    }

    #[test]
    fn test_cannot_answer_without_stats() {
        let mut state = GameState::default();
        assert!(!state.can_answer());

        state.user_stats = Some(stats(0, 0, 0));
        assert!(state.can_answer());
    }

    #[tokio::test]
    async fn test_last_error_wins() {
        let shared = SharedState::default();
        shared
            .report(QuizError::EncryptionFailure("first".to_string()))
            .await;
        shared
            .report(QuizError::ChainRejected("second".to_string()))
            .await;
        assert_eq!(
            shared.snapshot().await.error,
            Some(QuizError::ChainRejected("second".to_string()))
        );

        shared.clear_error().await;
        assert!(shared.read().await.error.is_none());
    }

    #[tokio::test]
    async fn test_loading_is_nested() {
        let shared = SharedState::default();
        shared.begin_loading().await;
        shared.begin_loading().await;
        shared.end_loading().await;
        assert!(shared.read().await.is_loading());
        shared.end_loading().await;
        shared.end_loading().await;
        assert!(!shared.read().await.is_loading());
    }
}
