// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::output::print_json;
use anyhow::{bail, Result};
use quiz_evm::UserStats;
use quiz_game::{QuizGame, DAILY_ANSWER_LIMIT};
use serde::Serialize;

#[derive(Serialize)]
struct StatsReport<'a> {
    #[serde(flatten)]
    stats: &'a UserStats,
    accuracy: f64,
    can_answer: bool,
    daily_limit: u64,
}

pub async fn execute(game: &QuizGame, json: bool) -> Result<()> {
    game.load_user_stats().await;

    let state = game.state().read().await;
    let Some(stats) = &state.user_stats else {
        bail!("Could not read stats for {:?}", game.user());
    };

    let report = StatsReport {
        stats,
        accuracy: state.accuracy(),
        can_answer: state.can_answer(),
        daily_limit: DAILY_ANSWER_LIMIT,
    };
    if json {
        return print_json(&report);
    }

    println!("Answered:     {}", stats.total_answered);
    println!("Correct:      {}", stats.correct_answers);
    println!("Accuracy:     {:.1}%", report.accuracy);
    println!("Rewards:      {}", stats.total_reward);
    println!("Today:        {}/{}", stats.daily_answers, DAILY_ANSWER_LIMIT);
    if !report.can_answer {
        println!("Daily limit reached");
    }

    Ok(())
}
