// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::QuizError;
use quiz_evm::{LeaderboardEntry, LeaderboardRead};
use std::sync::Arc;

/// Reads rankings from the ranking authority. Entries, order and ranks are returned untouched.
#[derive(Clone)]
pub struct LeaderboardAggregator {
    source: Option<Arc<dyn LeaderboardRead>>,
    kind: u8,
}

impl LeaderboardAggregator {
    pub fn new(source: Option<Arc<dyn LeaderboardRead>>, kind: u8) -> Self {
        Self { source, kind }
    }

    /// Empty when no ranking contract is deployed
    pub async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<LeaderboardEntry>, QuizError> {
        let Some(source) = &self.source else {
            return Ok(vec![]);
        };
        if !source.has_code().await.map_err(QuizError::read)? {
            return Ok(vec![]);
        }
        source
            .get_leaderboard(self.kind, offset, limit)
            .await
            .map_err(QuizError::read)
    }
}
