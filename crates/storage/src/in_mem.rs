// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::StringStorage;
use async_trait::async_trait;
use eyre::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-lifetime store. The default backend.
#[derive(Default)]
pub struct InMemoryStringStorage {
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryStringStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }
}

#[async_trait]
impl StringStorage for InMemoryStringStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.data.write().await.remove(key);
        Ok(())
    }
}
