// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::print_json;
use anyhow::Result;
use quiz_game::QuizGame;
use serde_json::json;

pub async fn execute(game: &QuizGame, answer_index: u64, answer: u32, json: bool) -> Result<()> {
    let tx = game.verify_answer(answer_index, answer).await?;
    if json {
        return print_json(&json!({ "answer_index": answer_index, "tx": tx }));
    }
    println!("Verified answer #{answer_index} in {tx}");
    Ok(())
}
