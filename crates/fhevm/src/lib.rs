// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod bfv;
mod eip712;
mod error;
mod input;
mod instance;
mod mock;
mod relayer;
mod signature;
mod signature_cache;
mod signer;
mod types;

pub use eip712::*;
pub use error::*;
pub use input::*;
pub use instance::*;
pub use mock::*;
pub use relayer::*;
pub use signature::*;
pub use signature_cache::*;
pub use signer::*;
pub use types::*;

use quiz_config::{ChainConfig, FhevmMode};
use quiz_storage::StringStorage;
use std::sync::Arc;

/// Build the capability configured for `chain`
pub async fn create_instance(
    chain: &ChainConfig,
    storage: Arc<dyn StringStorage>,
) -> Result<Arc<dyn FhevmInstance>, FhevmError> {
    Ok(match &chain.fhevm.mode {
        FhevmMode::Simulation => Arc::new(MockFhevmInstance::new(
            chain.chain_id,
            chain.fhevm.kms_verifier,
        )),
        FhevmMode::Relayer { url } => {
            Arc::new(RelayerFhevmInstance::connect(url, chain, storage).await?)
        }
    })
}
