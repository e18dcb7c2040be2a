// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod fake_game;
mod fake_ranking;
mod local_fhevm;
mod signer;

pub use fake_game::*;
pub use fake_ranking::*;
pub use local_fhevm::*;
pub use signer::*;

use quiz_evm::{LeaderboardRead, QuizContracts, TokenRead};
use std::sync::Arc;

/// Contract set backed by the fakes
pub fn fake_contracts(
    game: Arc<FakeAnswerGame>,
    leaderboard: Option<Arc<FakeLeaderboard>>,
    token: Option<Arc<FakeToken>>,
) -> QuizContracts {
    QuizContracts {
        game: game.clone(),
        game_writer: Some(game),
        leaderboard: leaderboard.map(|l| l as Arc<dyn LeaderboardRead>),
        token: token.map(|t| t as Arc<dyn TokenRead>),
    }
}
