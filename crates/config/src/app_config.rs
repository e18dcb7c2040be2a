// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::chain_config::{ChainConfig, HARDHAT_CHAIN_ID};
use crate::load_config::{find_in_parent, resolve_config_path};
use crate::yaml::load_yaml_with_env;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_NAME: &str = "quiz.config.yaml";
pub const ENV_PREFIX: &str = "QUIZ_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DecryptionConfig {
    /// Lifetime of a signed decryption grant
    pub duration_days: u64,
}

impl Default for DecryptionConfig {
    fn default() -> Self {
        Self { duration_days: 365 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageConfig {
    pub page_size: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    /// Ranking category understood by the ranking authority
    pub kind: u8,
    pub limit: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { kind: 0, limit: 10 }
    }
}

/// Backend for the key-value string store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum StorageConfig {
    InMemory,
    Sled { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::InMemory
    }
}

/// The config actually used throughout the app
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Chain used when no chain is requested or the requested one is unknown
    pub default_chain: u64,
    pub chains: Vec<ChainConfig>,
    pub decryption: DecryptionConfig,
    pub questions: PageConfig,
    pub leaderboard: LeaderboardConfig,
    pub answers: PageConfig,
    pub storage: StorageConfig,
    /// The file this config was read from, if any
    #[serde(skip)]
    config_file: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_chain: HARDHAT_CHAIN_ID,
            chains: vec![ChainConfig::hardhat(), ChainConfig::sepolia()],
            decryption: DecryptionConfig::default(),
            questions: PageConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            answers: PageConfig::default(),
            storage: StorageConfig::default(),
            config_file: None,
        }
    }
}

impl QuizConfig {
    /// Resolve the chain for `chain_id`, falling back to `default_chain`
    pub fn chain(&self, chain_id: Option<u64>) -> Result<&ChainConfig> {
        if let Some(id) = chain_id {
            if let Some(chain) = self.chains.iter().find(|c| c.chain_id == id) {
                return Ok(chain);
            }
            warn!(chain_id = id, "No configuration for chain, using the default chain");
        }

        let Some(chain) = self
            .chains
            .iter()
            .find(|c| c.chain_id == self.default_chain)
        else {
            bail!(
                "Default chain {} is not present in the `chains` configuration",
                self.default_chain
            );
        };
        Ok(chain)
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    fn validate(&self) -> Result<()> {
        for chain in &self.chains {
            chain.rpc_url()?;
        }
        if self.decryption.duration_days == 0 {
            bail!("decryption.duration_days must be greater than zero");
        }
        Ok(())
    }
}

fn figment(yaml: &str) -> Figment {
    let figment = Figment::from(Serialized::defaults(QuizConfig::default()));
    if yaml.trim().is_empty() {
        figment
    } else {
        figment.merge(Yaml::string(yaml))
    }
}

fn extract(figment: Figment) -> Result<QuizConfig> {
    let config: QuizConfig = figment.extract().context("Could not parse configuration")?;
    config.validate()?;
    Ok(config)
}

/// Build a config from yaml text layered over the defaults
pub fn config_from_yaml(yaml: &str) -> Result<QuizConfig> {
    extract(figment(yaml))
}

/// Load the config at the config_file or the default location if not provided, then apply
/// `QUIZ_` prefixed env vars. A missing default file is not an error: the built in address
/// book is used.
pub fn load_config(config_file: Option<String>) -> Result<QuizConfig> {
    let cli_file = config_file.map(PathBuf::from);
    let explicit = cli_file.is_some();

    let resolved_config_path = resolve_config_path(
        find_in_parent,
        &env::current_dir()?,
        &OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        cli_file.as_deref(),
    );

    let loaded_yaml = match load_yaml_with_env(&resolved_config_path) {
        Ok(yaml) => Some(yaml),
        Err(err)
            if !explicit
                && matches!(
                    err.downcast_ref::<std::io::Error>(),
                    Some(ioe) if ioe.kind() == std::io::ErrorKind::NotFound
                ) =>
        {
            None
        }
        Err(err) => return Err(err.context("Configuration file not found")),
    };

    let mut config = extract(
        figment(loaded_yaml.as_deref().unwrap_or_default())
            .merge(Env::prefixed(ENV_PREFIX).split("__")),
    )?;
    if loaded_yaml.is_some() {
        config.config_file = Some(resolved_config_path);
    }
    Ok(config)
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        let Some(dir) = dirs::config_dir() else {
            bail!("The OS does not provide a config dir. See https://docs.rs/dirs for more information.");
        };
        Ok(dir.join("quiz"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_config::{FhevmMode, SEPOLIA_CHAIN_ID};
    use alloy_primitives::address;
    use figment::Jail;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = config_from_yaml("")?;
        assert_eq!(config.default_chain, HARDHAT_CHAIN_ID);
        assert_eq!(config.decryption.duration_days, 365);
        assert_eq!(config.questions.page_size, 10);
        assert_eq!(config.leaderboard, LeaderboardConfig { kind: 0, limit: 10 });
        assert_eq!(config.storage, StorageConfig::InMemory);

        let chain = config.chain(None)?;
        assert_eq!(chain.name, "hardhat");
        assert!(chain.fhevm.is_simulation());
        Ok(())
    }

    #[test]
    fn test_unknown_chain_falls_back_to_default() -> Result<()> {
        let config = QuizConfig::default();
        assert_eq!(config.chain(Some(1))?.chain_id, HARDHAT_CHAIN_ID);
        assert_eq!(
            config.chain(Some(SEPOLIA_CHAIN_ID))?.contracts.answer_game,
            address!("B033734707ee59ca64749B44013F0A561078B4d7")
        );
        Ok(())
    }

    #[test]
    fn test_missing_default_chain() {
        let config = QuizConfig {
            default_chain: 5,
            ..QuizConfig::default()
        };
        assert!(config.chain(None).is_err());
    }

    #[test]
    fn test_deserialization() -> Result<()> {
        let config = config_from_yaml(
            r#"
default_chain: 11155111
chains:
  - name: "sepolia"
    chain_id: 11155111
    rpc_url: "wss://sepolia.example.org"
    contracts:
      answer_game: "0xB033734707ee59ca64749B44013F0A561078B4d7"
    fhevm:
      mode:
        type: relayer
        url: "https://relayer.example.org"
      acl: "0x687820221192C5B662b25367F70076A37bc79b6c"
      kms_verifier: "0x1364cBBf2cDF5032C47d8226a6f6FBD2AFCDacAC"
      input_verifier: "0xbc91f3daD1A5F19F8390c400196e58073B6a0BC4"
      gateway_chain_id: 55815
decryption:
  duration_days: 30
storage:
  type: sled
  path: "/tmp/quiz-db"
"#,
        )?;

        let chain = config.chain(None)?;
        assert_eq!(chain.name, "sepolia");
        assert_eq!(chain.contracts.answer_token, None);
        assert_eq!(
            chain.fhevm.mode,
            FhevmMode::Relayer {
                url: "https://relayer.example.org".to_string()
            }
        );
        assert_eq!(chain.fhevm.bfv.degree, 2048);
        assert_eq!(chain.rpc_url()?.as_http_url()?, "https://sepolia.example.org/");
        assert_eq!(config.decryption.duration_days, 30);
        assert_eq!(
            config.storage,
            StorageConfig::Sled {
                path: PathBuf::from("/tmp/quiz-db")
            }
        );
        Ok(())
    }

    #[test]
    fn test_written_config_reads_back() -> Result<()> {
        let config = QuizConfig {
            default_chain: SEPOLIA_CHAIN_ID,
            decryption: DecryptionConfig { duration_days: 30 },
            storage: StorageConfig::Sled {
                path: PathBuf::from("/tmp/quiz-db"),
            },
            ..QuizConfig::default()
        };

        let yaml = serde_yaml::to_string(&config)?;
        let read = config_from_yaml(&yaml)?;

        assert_eq!(read.default_chain, SEPOLIA_CHAIN_ID);
        assert_eq!(read.chains, config.chains);
        assert_eq!(read.decryption, config.decryption);
        assert_eq!(read.storage, config.storage);
        assert_eq!(read.chain(None)?.name, "sepolia");
        Ok(())
    }

    #[test]
    fn test_invalid_rpc_rejected() {
        let result = config_from_yaml(
            r#"
chains:
  - name: "broken"
    chain_id: 1
    rpc_url: "ftp://nowhere"
    contracts:
      answer_game: "0xB033734707ee59ca64749B44013F0A561078B4d7"
    fhevm:
      acl: "0x687820221192C5B662b25367F70076A37bc79b6c"
      kms_verifier: "0x1364cBBf2cDF5032C47d8226a6f6FBD2AFCDacAC"
      input_verifier: "0xbc91f3daD1A5F19F8390c400196e58073B6a0BC4"
      gateway_chain_id: 55815
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_not_found() -> Result<()> {
        let Err(err) = load_config(Some("/nope/quiz.config.yaml".to_string())) else {
            bail!("error expected");
        };
        let Some(e) = err.downcast_ref::<std::io::Error>() else {
            bail!("io error expected");
        };
        assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_config_file_with_env() {
        Jail::expect_with(|jail| {
            jail.set_env("SEPOLIA_RPC", "https://rpc.example.org");
            jail.set_env("QUIZ_DECRYPTION__DURATION_DAYS", "7");
            jail.create_file(
                DEFAULT_CONFIG_NAME,
                r#"
default_chain: 11155111
chains:
  - name: "sepolia"
    chain_id: 11155111
    rpc_url: "${SEPOLIA_RPC}"
    contracts:
      answer_game: "0xB033734707ee59ca64749B44013F0A561078B4d7"
      leaderboard: "0x7001469CDb36FAf11946C076aaef460b3BcF552C"
    fhevm:
      acl: "0x687820221192C5B662b25367F70076A37bc79b6c"
      kms_verifier: "0x1364cBBf2cDF5032C47d8226a6f6FBD2AFCDacAC"
      input_verifier: "0xbc91f3daD1A5F19F8390c400196e58073B6a0BC4"
      gateway_chain_id: 55815
"#,
            )?;

            let config = load_config(None).map_err(|e| e.to_string())?;
            let chain = config.chain(None).map_err(|e| e.to_string())?;

            assert_eq!(chain.rpc_url, "https://rpc.example.org");
            assert!(chain.fhevm.is_simulation());
            assert_eq!(config.decryption.duration_days, 7);
            assert!(config.config_file().is_some());
            Ok(())
        });
    }
}
