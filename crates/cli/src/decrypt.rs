// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::{describe_verification, print_json};
use anyhow::Result;
use quiz_game::QuizGame;

pub async fn execute(game: &QuizGame, answer_index: u64, json: bool) -> Result<()> {
    let outcome = game.decrypt_and_verify(answer_index).await?;
    if json {
        return print_json(&outcome);
    }
    println!("{}", describe_verification(&outcome));
    Ok(())
}
