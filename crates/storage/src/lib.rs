// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod in_mem;
mod public_key;
mod sled_store;
mod store_keys;
mod traits;

pub use in_mem::*;
pub use public_key::*;
pub use sled_store::*;
pub use store_keys::*;
pub use traits::*;

use eyre::Result;
use quiz_config::StorageConfig;
use std::sync::Arc;

/// Open the store selected in the configuration
pub fn storage_from_config(config: &StorageConfig) -> Result<Arc<dyn StringStorage>> {
    Ok(match config {
        StorageConfig::InMemory => Arc::new(InMemoryStringStorage::new()),
        StorageConfig::Sled { path } => Arc::new(SledStringStorage::open(path)?),
    })
}
