// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Deployed addresses for a single chain
#[derive(Debug, Clone, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractAddresses {
    /// The game contract holding questions, answers and the verification entrypoint
    pub answer_game: Address,
    /// ERC-20 reward token
    #[serde(default)]
    pub answer_token: Option<Address>,
    /// Ranking authority
    #[serde(default)]
    pub leaderboard: Option<Address>,
}
