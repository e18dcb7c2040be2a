// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    bindings::{AnswerToken, Leaderboard},
    LeaderboardEntry, ProviderType, QuizContract,
};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use eyre::Result;

/// The ranking authority
#[async_trait]
pub trait LeaderboardRead: Send + Sync {
    async fn has_code(&self) -> Result<bool>;

    async fn get_leaderboard(
        &self,
        kind: u8,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<LeaderboardEntry>>;

    async fn get_user_rank(&self, kind: u8, user: Address) -> Result<U256>;
}

/// Reward token balance lookups
#[async_trait]
pub trait TokenRead: Send + Sync {
    async fn balance_of(&self, owner: Address) -> Result<U256>;
}

#[async_trait]
impl<T> LeaderboardRead for QuizContract<T>
where
    T: ProviderType,
{
    async fn has_code(&self) -> Result<bool> {
        self.code_deployed().await
    }

    async fn get_leaderboard(
        &self,
        kind: u8,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<LeaderboardEntry>> {
        let contract = Leaderboard::new(self.contract_address, &self.provider);
        let entries = contract
            .getLeaderboard(kind, U256::from(offset), U256::from(limit))
            .call()
            .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn get_user_rank(&self, kind: u8, user: Address) -> Result<U256> {
        let contract = Leaderboard::new(self.contract_address, &self.provider);
        let rank = contract.getUserRank(kind, user).call().await?;
        Ok(rank)
    }
}

#[async_trait]
impl<T> TokenRead for QuizContract<T>
where
    T: ProviderType,
{
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        let contract = AnswerToken::new(self.contract_address, &self.provider);
        let balance = contract.balanceOf(owner).call().await?;
        Ok(balance)
    }
}
