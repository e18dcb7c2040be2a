// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod answer_game;
pub mod bindings;
mod contracts;
mod leaderboard;
mod models;
mod provider;

pub use answer_game::*;
pub use contracts::*;
pub use leaderboard::*;
pub use models::*;
pub use provider::{
    ProviderType, QuizContract, QuizContractFactory, QuizReadContract, QuizReadOnlyProvider,
    QuizWriteContract, QuizWriteProvider, ReadOnly, ReadWrite,
};
