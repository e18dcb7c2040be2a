// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::print_json;
use anyhow::Result;
use quiz_game::QuizGame;

pub async fn execute(game: &QuizGame, json: bool) -> Result<()> {
    game.load_leaderboard().await;

    let state = game.state().read().await;
    if json {
        return print_json(&state.leaderboard);
    }

    if state.leaderboard.is_empty() {
        println!("No ranking available on chain {}", game.chain_id());
        return Ok(());
    }

    for entry in &state.leaderboard {
        println!(
            "{:>4}  {}  score {}  correct {}/{}  reward {}",
            entry.rank,
            entry.user,
            entry.score,
            entry.correct_answers,
            entry.total_answered,
            entry.total_reward
        );
    }

    Ok(())
}
