// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Result};
use quiz_config::{QuizConfig, StorageConfig};
use quiz_evm::QuizContracts;
use quiz_fhevm::{create_instance, FhevmInstance, WalletSigner};
use quiz_game::{GameSettings, QuizGame, SharedState};
use quiz_storage::{storage_from_config, SledStringStorage};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// A game wired to the configured chain, capability and store
pub struct Session {
    game: QuizGame,
    sled_path: Option<PathBuf>,
}

impl Session {
    pub async fn connect(
        config: &QuizConfig,
        chain_id: Option<u64>,
        wallet: Option<PrivateKeySigner>,
    ) -> Result<Self> {
        let chain = config.chain(chain_id)?;
        let storage = storage_from_config(&config.storage).map_err(|e| anyhow!("{e:#}"))?;

        // The capability is only used by writes
        let instance = match wallet {
            Some(_) => Some(create_instance(chain, storage.clone()).await?),
            None => None,
        };
        let contracts = QuizContracts::connect(chain, wallet.clone())
            .await
            .map_err(|e| anyhow!("{e:#}"))?;
        let signer = wallet.map(|wallet| Arc::new(wallet) as Arc<dyn WalletSigner>);

        info!(
            chain = %chain.name,
            chain_id = chain.chain_id,
            game = %chain.contracts.answer_game,
            simulation = instance.as_ref().map(|i| i.is_simulation()),
            "Session ready"
        );

        let game = QuizGame::new(
            chain.chain_id,
            &GameSettings::from(config),
            contracts,
            instance,
            signer,
            storage,
            SharedState::default(),
        );

        let sled_path = match &config.storage {
            StorageConfig::Sled { path } => Some(path.clone()),
            StorageConfig::InMemory => None,
        };

        Ok(Self { game, sled_path })
    }

    pub fn game(&self) -> &QuizGame {
        &self.game
    }

    /// Flush and release the on-disk store
    pub fn close(&self) {
        if let Some(path) = &self.sled_path {
            SledStringStorage::close(path);
        }
    }
}
