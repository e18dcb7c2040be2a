// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, TxHash},
    providers::fillers::{
        BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    providers::{Identity, Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
};
use eyre::{bail, Result};
use once_cell::sync::Lazy;
use std::{marker::PhantomData, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

/// Serializes transactions sent from this process so cached nonces stay in order
pub(crate) static NONCE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub trait ProviderType: Send + Sync + 'static {
    type Provider: Provider + Send + Sync + 'static;
}

/// Marker type for read-only provider
#[derive(Clone)]
pub struct ReadOnly;
impl ProviderType for ReadOnly {
    type Provider = QuizReadOnlyProvider;
}

/// Marker type for read-write provider
#[derive(Clone)]
pub struct ReadWrite;
impl ProviderType for ReadWrite {
    type Provider = QuizWriteProvider;
}

pub type QuizReadOnlyProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
>;

pub type QuizWriteProvider = FillProvider<
    JoinFill<
        JoinFill<
            JoinFill<
                Identity,
                JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
            >,
            WalletFiller<EthereumWallet>,
        >,
        NonceFiller,
    >,
    RootProvider<Ethereum>,
    Ethereum,
>;

/// A deployed quiz contract behind a provider. Which calls are available depends on the traits
/// implemented for the marker `T`.
#[derive(Clone)]
pub struct QuizContract<T: ProviderType> {
    pub provider: Arc<T::Provider>,
    pub contract_address: Address,
    _marker: PhantomData<T>,
}

impl<T: ProviderType> QuizContract<T> {
    pub fn address(&self) -> Address {
        self.contract_address
    }

    /// Another contract reached through the same provider
    pub fn at(&self, contract_address: Address) -> Self {
        Self {
            provider: self.provider.clone(),
            contract_address,
            _marker: PhantomData,
        }
    }

    pub(crate) async fn code_deployed(&self) -> Result<bool> {
        let code = self.provider.get_code_at(self.contract_address).await?;
        Ok(!code.is_empty())
    }
}

pub type QuizReadContract = QuizContract<ReadOnly>;
pub type QuizWriteContract = QuizContract<ReadWrite>;

pub struct QuizContractFactory;

impl QuizContractFactory {
    pub async fn create_write(
        http_rpc_url: &str,
        contract_address: Address,
        signer: PrivateKeySigner,
    ) -> Result<QuizWriteContract> {
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .with_cached_nonce_management()
            .connect(http_rpc_url)
            .await?;

        Ok(QuizContract {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }

    pub async fn create_read(
        http_rpc_url: &str,
        contract_address: Address,
    ) -> Result<QuizReadContract> {
        let provider = ProviderBuilder::new().connect(http_rpc_url).await?;

        Ok(QuizContract {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }
}

/// Hash of a mined transaction, or an error when it reverted
pub(crate) fn confirmed(receipt: TransactionReceipt, call: &str) -> Result<TxHash> {
    let tx = receipt.transaction_hash;
    if !receipt.status() {
        bail!("{call} reverted in transaction {tx}");
    }
    info!(%tx, "{call} confirmed");
    Ok(tx)
}
