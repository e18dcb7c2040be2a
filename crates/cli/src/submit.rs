// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::{describe_verification, print_json};
use anyhow::Result;
use quiz_game::{QuizGame, SubmitOutcome, VerificationOutcome};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
struct SubmitReport {
    question_id: u64,
    answer: u32,
    #[serde(flatten)]
    outcome: SubmitOutcome,
    verifications: Vec<VerificationOutcome>,
}

pub async fn execute(
    game: &QuizGame,
    question_id: u64,
    answer: u32,
    wait: bool,
    json: bool,
) -> Result<()> {
    // Loaded questions give the local verdict; stats gate the daily limit
    game.load_questions().await;
    game.load_user_stats().await;
    if let Some(err) = game.state().read().await.error.clone() {
        warn!("Submitting without question details: {err}");
    }

    let outcome = game.submit_answer(question_id, answer).await?;
    if !json {
        match outcome.correct_answer {
            Some(_) if outcome.ok => println!("Answer {answer} to question {question_id} is correct"),
            Some(_) => println!("Answer {answer} to question {question_id} is not correct"),
            None => println!("Answer {answer} to question {question_id} submitted"),
        }
        println!("Transaction: {}", outcome.tx);
    }

    let mut verifications = Vec::new();
    let mut failure = None;
    if wait {
        for result in game.wait_for_verifications().await {
            match result {
                Ok(verification) => verifications.push(verification),
                Err(err) => failure = Some(err),
            }
        }
    }

    if json {
        print_json(&SubmitReport {
            question_id,
            answer,
            outcome,
            verifications,
        })?;
    } else {
        for verification in &verifications {
            println!("{}", describe_verification(verification));
        }
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
