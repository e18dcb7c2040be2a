// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::print_json;
use anyhow::Result;
use quiz_game::QuizGame;
use serde_json::json;

pub async fn execute(game: &QuizGame, json: bool) -> Result<()> {
    let balance = game.token_balance().await;
    if json {
        return print_json(&json!({ "user": game.user(), "balance": balance }));
    }
    println!("{balance}");
    Ok(())
}
