// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{AnswerGameRead, AnswerGameWrite, LeaderboardRead, QuizContractFactory, TokenRead};
use alloy::signers::local::PrivateKeySigner;
use eyre::{eyre, Result};
use quiz_config::ChainConfig;
use std::sync::Arc;
use tracing::info;

/// Every contract the game talks to on one chain.
///
/// `game_writer` is only present when a wallet key was supplied. Leaderboard and token are
/// optional deployments.
#[derive(Clone)]
pub struct QuizContracts {
    pub game: Arc<dyn AnswerGameRead>,
    pub game_writer: Option<Arc<dyn AnswerGameWrite>>,
    pub leaderboard: Option<Arc<dyn LeaderboardRead>>,
    pub token: Option<Arc<dyn TokenRead>>,
}

impl QuizContracts {
    pub async fn connect(chain: &ChainConfig, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let rpc = chain.rpc_url().map_err(|e| eyre!("{e}"))?;
        let rpc_url = rpc.as_http_url().map_err(|e| eyre!("{e}"))?;
        let addresses = &chain.contracts;

        let reader = QuizContractFactory::create_read(&rpc_url, addresses.answer_game).await?;
        let game_writer: Option<Arc<dyn AnswerGameWrite>> = match signer {
            Some(signer) => Some(Arc::new(
                QuizContractFactory::create_write(&rpc_url, addresses.answer_game, signer).await?,
            )),
            None => None,
        };

        let leaderboard = addresses
            .leaderboard
            .map(|address| Arc::new(reader.at(address)) as Arc<dyn LeaderboardRead>);
        let token = addresses
            .answer_token
            .map(|address| Arc::new(reader.at(address)) as Arc<dyn TokenRead>);

        info!(
            chain = %chain.name,
            game = %addresses.answer_game,
            local = rpc.is_local(),
            writable = game_writer.is_some(),
            "Connected quiz contracts"
        );

        Ok(Self {
            game: Arc::new(reader),
            game_writer,
            leaderboard,
            token,
        })
    }
}
