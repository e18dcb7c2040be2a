// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use eyre::{bail, Result};
use quiz_evm::{LeaderboardEntry, LeaderboardRead, TokenRead};
use std::collections::HashMap;

/// Ranking authority returning a fixed table in the order given
#[derive(Default)]
pub struct FakeLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub fail: bool,
}

impl FakeLeaderboard {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries,
            fail: false,
        }
    }
}

#[async_trait]
impl LeaderboardRead for FakeLeaderboard {
    async fn has_code(&self) -> Result<bool> {
        Ok(true)
    }

    async fn get_leaderboard(
        &self,
        _kind: u8,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<LeaderboardEntry>> {
        if self.fail {
            bail!("rpc unavailable");
        }
        Ok(self
            .entries
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_user_rank(&self, _kind: u8, user: Address) -> Result<U256> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.user == user)
            .map(|e| e.rank)
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeToken {
    pub balances: HashMap<Address, U256>,
    pub fail: bool,
}

#[async_trait]
impl TokenRead for FakeToken {
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        if self.fail {
            bail!("rpc unavailable");
        }
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }
}

pub fn entry(user: Address, score: u64, rank: u64) -> LeaderboardEntry {
    LeaderboardEntry {
        user,
        score: U256::from(score),
        correct_answers: U256::from(score / 10),
        total_answered: U256::from(score / 10),
        total_reward: U256::from(score),
        rank: U256::from(rank),
    }
}
