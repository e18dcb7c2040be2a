// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    DecryptionSignature, FhevmError, FhevmInstance, UserDecryptRequestVerification, WalletSigner,
};
use alloy::primitives::{Address, U256};
use quiz_storage::{StoreKeys, StringStorage, StringStorageExt};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Derives, signs, caches and expires decryption grants.
///
/// Grants are stored under `(chain, user, sorted contracts)`. Concurrent callers asking for the same key
/// wait on a per-key lock so only one of them prompts the wallet; different keys never block each
/// other.
pub struct DecryptionSignatureCache {
    storage: Arc<dyn StringStorage>,
    duration_days: u64,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DecryptionSignatureCache {
    pub fn new(storage: Arc<dyn StringStorage>, duration_days: u64) -> Self {
        Self {
            storage,
            duration_days,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn duration_days(&self) -> u64 {
        self.duration_days
    }

    pub async fn load_or_sign(
        &self,
        instance: &dyn FhevmInstance,
        contracts: &[Address],
        signer: &dyn WalletSigner,
    ) -> Result<DecryptionSignature, FhevmError> {
        self.load_or_sign_at(instance, contracts, signer, unix_now())
            .await
    }

    /// [`Self::load_or_sign`] with an explicit clock
    pub async fn load_or_sign_at(
        &self,
        instance: &dyn FhevmInstance,
        contracts: &[Address],
        signer: &dyn WalletSigner,
        now: u64,
    ) -> Result<DecryptionSignature, FhevmError> {
        let user = signer.address();
        let mut contracts = contracts.to_vec();
        contracts.sort();
        contracts.dedup();

        let chain_id = instance.chain_id();
        let key = StoreKeys::decryption_signature(chain_id, &user, &contracts);
        let entry = self.key_lock(&key);
        let _guard = entry.lock.lock().await;

        if let Some(cached) = self.load(&key, &user, chain_id, &contracts, now).await {
            return Ok(cached);
        }

        let keypair = instance.generate_keypair()?;
        let request = UserDecryptRequestVerification {
            publicKey: keypair.public_key.clone(),
            contractAddresses: contracts.clone(),
            startTimestamp: U256::from(now),
            durationDays: U256::from(self.duration_days),
        };

        info!(%user, contracts = contracts.len(), "Requesting decryption signature");
        let signature = signer
            .sign_decryption_request(&instance.eip712_domain(), &request)
            .await?;

        let grant = DecryptionSignature {
            private_key: keypair.private_key,
            public_key: keypair.public_key,
            signature,
            contract_addresses: contracts,
            user_address: user,
            chain_id,
            start_timestamp: now,
            duration_days: self.duration_days,
        };

        self.storage
            .set_json(&key, &grant)
            .await
            .map_err(|e| FhevmError::Storage(e.to_string()))?;

        Ok(grant)
    }

    /// A stored grant for `key` that is still usable. Unreadable entries count as missing.
    async fn load(
        &self,
        key: &str,
        user: &Address,
        chain_id: u64,
        contracts: &[Address],
        now: u64,
    ) -> Option<DecryptionSignature> {
        match self.storage.get_json::<DecryptionSignature>(key).await {
            Ok(Some(grant)) if grant.is_valid_for(user, chain_id, contracts, now) => Some(grant),
            Ok(Some(grant)) => {
                info!(
                    %user,
                    expires_at = grant.expires_at(),
                    "Cached decryption signature is no longer usable"
                );
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(%user, "Ignoring unreadable decryption signature: {err}");
                None
            }
        }
    }

    fn key_lock(&self, key: &str) -> KeyLock<'_> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        let lock = in_flight.entry(key.to_string()).or_default().clone();
        KeyLock {
            cache: self,
            key: key.to_string(),
            lock,
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Per-key lock handle. The last holder removes the key from the in-flight map on drop.
struct KeyLock<'a> {
    cache: &'a DecryptionSignatureCache,
    key: String,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .cache
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        // one reference in the map, one here
        if Arc::strong_count(&self.lock) == 2 {
            in_flight.remove(&self.key);
        }
    }
}
