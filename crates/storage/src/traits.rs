// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use async_trait::async_trait;
use eyre::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Trait for an injectable string store. Note the implementor must manage interior mutability
#[async_trait]
pub trait StringStorage: Send + Sync + 'static {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Create or overwrite
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// JSON helpers available on every [`StringStorage`]
#[async_trait]
pub trait StringStorageExt: StringStorage {
    /// `Ok(None)` for a missing key. An entry that is not valid json for `T` is an error.
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        self.get_item(key)
            .await?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw).await
    }
}

impl<S: StringStorage + ?Sized> StringStorageExt for S {}
