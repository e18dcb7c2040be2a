// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::bindings;
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

fn to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// A question as stored by the game contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: u32,
    /// 1 to 5
    pub difficulty: u8,
    pub active: bool,
}

impl From<bindings::Question> for Question {
    fn from(value: bindings::Question) -> Self {
        Self {
            id: to_u64(value.id),
            text: value.questionText,
            options: value.options,
            correct_answer: value.correctAnswer,
            difficulty: value.difficulty,
            active: value.isActive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_answered: u64,
    pub correct_answers: u64,
    pub total_reward: U256,
    pub daily_answers: u64,
    pub last_answer_date: u64,
}

impl From<bindings::UserStats> for UserStats {
    fn from(value: bindings::UserStats) -> Self {
        Self {
            total_answered: to_u64(value.totalAnswered),
            correct_answers: to_u64(value.correctAnswers),
            total_reward: value.totalReward,
            daily_answers: to_u64(value.dailyAnswers),
            last_answer_date: to_u64(value.lastAnswerDate),
        }
    }
}

/// One submitted answer. `is_correct` is `None` until the contract has verified it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: u64,
    pub encrypted_answer: B256,
    pub is_correct: Option<bool>,
    pub timestamp: u64,
    pub reward: U256,
}

impl AnswerRecord {
    pub fn is_pending(&self) -> bool {
        self.is_correct.is_none()
    }
}

impl From<bindings::UserAnswer> for AnswerRecord {
    fn from(value: bindings::UserAnswer) -> Self {
        Self {
            question_id: to_u64(value.questionId),
            encrypted_answer: value.encryptedAnswer,
            is_correct: value.isVerified.then_some(value.isCorrect),
            timestamp: to_u64(value.timestamp),
            reward: value.reward,
        }
    }
}

/// Ranking row. Passed through exactly as the ranking contract reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: Address,
    pub score: U256,
    pub correct_answers: U256,
    pub total_answered: U256,
    pub total_reward: U256,
    pub rank: U256,
}

impl From<bindings::LeaderboardEntry> for LeaderboardEntry {
    fn from(value: bindings::LeaderboardEntry) -> Self {
        Self {
            user: value.user,
            score: value.score,
            correct_answers: value.correctAnswers,
            total_answered: value.totalAnswered,
            total_reward: value.totalReward,
            rank: value.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unverified_answer_is_pending() {
        let raw = bindings::UserAnswer {
            questionId: U256::from(4),
            encryptedAnswer: B256::repeat_byte(7),
            isCorrect: false,
            isVerified: false,
            timestamp: U256::from(1_700_000_000u64),
            reward: U256::ZERO,
        };
        let record = AnswerRecord::from(raw.clone());
        assert!(record.is_pending());
        assert_eq!(record.question_id, 4);

        let verified = AnswerRecord::from(bindings::UserAnswer {
            isVerified: true,
            isCorrect: true,
            ..raw
        });
        assert_eq!(verified.is_correct, Some(true));
    }

    #[test]
    fn test_oversized_counters_saturate() {
        let stats = UserStats::from(bindings::UserStats {
            totalAnswered: U256::MAX,
            correctAnswers: U256::from(3),
            totalReward: U256::from(30),
            dailyAnswers: U256::from(3),
            lastAnswerDate: U256::ZERO,
        });
        assert_eq!(stats.total_answered, u64::MAX);
        assert_eq!(stats.correct_answers, 3);
    }

    #[test]
    fn test_question_conversion() {
        let question = Question::from(bindings::Question {
            id: U256::from(2),
            questionText: "2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            correctAnswer: 1,
            difficulty: 1,
            isActive: true,
        });
        assert_eq!(question.id, 2);
        assert_eq!(question.options.len(), 2);
        assert!(question.active);
    }
}
