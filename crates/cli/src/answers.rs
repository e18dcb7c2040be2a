// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::{answer_status, print_json};
use anyhow::Result;
use quiz_game::QuizGame;

pub async fn execute(game: &QuizGame, json: bool) -> Result<()> {
    game.load_user_answers().await;

    let state = game.state().read().await;
    if json {
        return print_json(&state.user_answers);
    }

    if state.user_answers.is_empty() {
        println!("No answers submitted yet");
        return Ok(());
    }

    for (index, record) in state.user_answers.iter().enumerate() {
        println!(
            "#{index}  question {}  {}  reward {}  at {}",
            record.question_id,
            answer_status(record),
            record.reward,
            record.timestamp
        );
    }

    Ok(())
}
