// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use quiz_evm::AnswerRecord;
use quiz_game::{QuizGame, VerificationOutcome};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fail with whatever the last operation left in the game's error slot
pub async fn surfaced_error(game: &QuizGame) -> Result<()> {
    match game.state().read().await.error.clone() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

pub fn answer_status(record: &AnswerRecord) -> &'static str {
    match record.is_correct {
        None => "pending",
        Some(true) => "correct",
        Some(false) => "wrong",
    }
}

pub fn describe_verification(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Skipped => "Judged on submission, nothing to verify".to_string(),
        VerificationOutcome::Verified {
            answer_index,
            plaintext,
            tx,
        } => format!("Verified answer #{answer_index} (decrypted option {plaintext}) in {tx}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{B256, U256};

    fn record(is_correct: Option<bool>) -> AnswerRecord {
        AnswerRecord {
            question_id: 1,
            encrypted_answer: B256::ZERO,
            is_correct,
            timestamp: 0,
            reward: U256::ZERO,
        }
    }

    #[test]
    fn test_answer_status() {
        assert_eq!(answer_status(&record(None)), "pending");
        assert_eq!(answer_status(&record(Some(true))), "correct");
        assert_eq!(answer_status(&record(Some(false))), "wrong");
    }

    #[test]
    fn test_describe_verification() {
        let text = describe_verification(&VerificationOutcome::Verified {
            answer_index: 4,
            plaintext: 2,
            tx: B256::ZERO,
        });
        assert!(text.starts_with("Verified answer #4 (decrypted option 2)"));
    }
}
