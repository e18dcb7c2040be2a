// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{StoreKeys, StringStorage, StringStorageExt};
use alloy_primitives::Address;
use base64::{engine::general_purpose::STANDARD, Engine};
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Network encryption key and the public parameters it was generated under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    pub public_key: Vec<u8>,
    pub public_params: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPublicKey {
    public_key: String,
    public_params: String,
}

impl From<&PublicKeyMaterial> for StoredPublicKey {
    fn from(value: &PublicKeyMaterial) -> Self {
        Self {
            public_key: STANDARD.encode(&value.public_key),
            public_params: STANDARD.encode(&value.public_params),
        }
    }
}

impl TryFrom<StoredPublicKey> for PublicKeyMaterial {
    type Error = base64::DecodeError;
    fn try_from(value: StoredPublicKey) -> Result<Self, Self::Error> {
        Ok(Self {
            public_key: STANDARD.decode(value.public_key)?,
            public_params: STANDARD.decode(value.public_params)?,
        })
    }
}

/// Durable cache of public key material keyed by the access-control authority.
/// Writes are create-or-overwrite; the last write wins.
#[derive(Clone)]
pub struct PublicKeyStorage {
    storage: Arc<dyn StringStorage>,
}

impl PublicKeyStorage {
    pub fn new(storage: Arc<dyn StringStorage>) -> Self {
        Self { storage }
    }

    /// An entry that cannot be decoded is reported as absent
    pub async fn get(&self, acl: &Address) -> Result<Option<PublicKeyMaterial>> {
        let key = StoreKeys::public_key(acl);
        let stored = match self.storage.get_json::<StoredPublicKey>(&key).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(%acl, "Ignoring unreadable public key entry: {err}");
                return Ok(None);
            }
        };

        Ok(stored.and_then(|stored| match PublicKeyMaterial::try_from(stored) {
            Ok(material) => Some(material),
            Err(err) => {
                warn!(%acl, "Ignoring public key entry with bad encoding: {err}");
                None
            }
        }))
    }

    pub async fn set(&self, acl: &Address, material: &PublicKeyMaterial) -> Result<()> {
        self.storage
            .set_json(&StoreKeys::public_key(acl), &StoredPublicKey::from(material))
            .await
    }
}
