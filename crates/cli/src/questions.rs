// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::{print_json, surfaced_error};
use anyhow::Result;
use quiz_game::QuizGame;

pub async fn execute(game: &QuizGame, json: bool) -> Result<()> {
    game.load_questions().await;
    surfaced_error(game).await?;

    let state = game.state().read().await;
    if json {
        return print_json(&state.questions);
    }

    if state.questions.is_empty() {
        println!("No active questions");
        return Ok(());
    }

    for question in &state.questions {
        let answered = match state.answered.get(&question.id) {
            Some(mark) if mark.ok => " (answered correctly)",
            Some(_) => " (answered)",
            None => "",
        };
        println!(
            "#{} [difficulty {}] {}{}",
            question.id, question.difficulty, question.text, answered
        );
        for (index, option) in question.options.iter().enumerate() {
            println!("    {index}) {option}");
        }
    }

    Ok(())
}
