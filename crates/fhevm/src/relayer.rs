// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    bfv, decryption_domain, signature_cache::unix_now, CiphertextHandle, DecryptionSignature,
    EncryptedInput, EncryptedInputResult, FhevmError, FhevmInstance, HandleContractPair, Keypair,
    ValidityProof,
};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::Eip712Domain,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use fhe::bfv::BfvParameters;
use quiz_config::ChainConfig;
use quiz_storage::{PublicKeyMaterial, PublicKeyStorage, StringStorage};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyUrlResponse {
    public_key: String,
    public_params: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InputProofRequest {
    contract_chain_id: u64,
    contract_address: Address,
    user_address: Address,
    ciphertexts: Vec<Bytes>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputProofResponse {
    handles: Vec<B256>,
    input_proof: Bytes,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestValidity {
    start_timestamp: String,
    duration_days: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDecryptRequest<'a> {
    handle_contract_pairs: &'a [HandleContractPair],
    request_validity: RequestValidity,
    contracts_chain_id: u64,
    gateway_chain_id: u64,
    contract_addresses: &'a [Address],
    user_address: Address,
    signature: &'a Bytes,
    public_key: &'a Bytes,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReencryptedValue {
    handle: CiphertextHandle,
    ciphertext: Bytes,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDecryptResponse {
    response: Vec<ReencryptedValue>,
}

/// Production capability talking to an fhEVM relayer over http.
///
/// Inputs are BFV encrypted under the network key before being sent for proof generation. User
/// decryption results come back re-encrypted under the grant's ephemeral key.
pub struct RelayerFhevmInstance {
    client: reqwest::Client,
    base_url: String,
    chain_id: u64,
    gateway_chain_id: u64,
    kms_verifier: Address,
    network_params: Arc<BfvParameters>,
    network_key: Vec<u8>,
    user_params: Arc<BfvParameters>,
}

impl RelayerFhevmInstance {
    /// Connect to the relayer at `url`. The network key is read from the public key store when
    /// present and fetched from the relayer otherwise.
    pub async fn connect(
        url: &str,
        chain: &ChainConfig,
        storage: Arc<dyn StringStorage>,
    ) -> Result<Self, FhevmError> {
        let client = reqwest::Client::new();
        let base_url = url.trim_end_matches('/').to_string();
        let keys = PublicKeyStorage::new(storage);
        let acl = chain.fhevm.acl;

        let cached = keys
            .get(&acl)
            .await
            .map_err(|e| FhevmError::Storage(e.to_string()))?;
        let material = match cached {
            Some(material) => {
                debug!(%acl, "Using cached network public key");
                material
            }
            None => {
                let material = fetch_public_key(&client, &base_url).await?;
                if let Err(err) = keys.set(&acl, &material).await {
                    warn!(%acl, "Could not cache network public key: {err}");
                }
                info!(%acl, "Fetched network public key from relayer");
                material
            }
        };

        Ok(Self {
            client,
            base_url,
            chain_id: chain.chain_id,
            gateway_chain_id: chain.fhevm.gateway_chain_id,
            kms_verifier: chain.fhevm.kms_verifier,
            network_params: bfv::decode_params(&material.public_params)?,
            network_key: material.public_key,
            user_params: bfv::build_params(&chain.fhevm.bfv)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }
}

async fn fetch_public_key(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<PublicKeyMaterial, FhevmError> {
    let response: KeyUrlResponse = client
        .get(format!("{base_url}/v1/keyurl"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let decode = |field: &str, value: &str| {
        STANDARD
            .decode(value)
            .map_err(|e| FhevmError::Relayer(format!("bad {field} encoding: {e}")))
    };

    Ok(PublicKeyMaterial {
        public_key: decode("publicKey", &response.public_key)?,
        public_params: decode("publicParams", &response.public_params)?,
    })
}

/// Decrypt relayer results for the requested handles with the grant's private key
fn open_reencrypted(
    params: &Arc<BfvParameters>,
    private_key: &[u8],
    pairs: &[HandleContractPair],
    response: UserDecryptResponse,
) -> Result<HashMap<CiphertextHandle, U256>, FhevmError> {
    let mut values = HashMap::new();
    for value in response.response {
        if !pairs.iter().any(|p| p.handle == value.handle) {
            warn!(handle = %value.handle, "Relayer returned an unrequested handle");
            continue;
        }
        let plaintext = bfv::decrypt_u64(params, private_key, &value.ciphertext)?;
        values.insert(value.handle, U256::from(plaintext));
    }
    Ok(values)
}

#[async_trait]
impl FhevmInstance for RelayerFhevmInstance {
    fn is_simulation(&self) -> bool {
        false
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn encrypt(&self, input: &EncryptedInput) -> Result<EncryptedInputResult, FhevmError> {
        if input.values().is_empty() {
            return Err(FhevmError::InvalidInput("no values added".to_string()));
        }

        let ciphertexts = input
            .values()
            .iter()
            .map(|value| bfv::encrypt_u32(&self.network_params, &self.network_key, *value))
            .map(|ct| ct.map(Bytes::from))
            .collect::<Result<Vec<_>, _>>()?;

        let request = InputProofRequest {
            contract_chain_id: self.chain_id,
            contract_address: input.contract(),
            user_address: input.user(),
            ciphertexts,
        };

        let response: InputProofResponse = self
            .client
            .post(self.endpoint("input-proof"))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.handles.len() != input.values().len() {
            return Err(FhevmError::Encryption(format!(
                "relayer returned {} handles for {} values",
                response.handles.len(),
                input.values().len()
            )));
        }

        Ok(EncryptedInputResult {
            handles: response.handles,
            input_proof: ValidityProof(response.input_proof),
        })
    }

    fn generate_keypair(&self) -> Result<Keypair, FhevmError> {
        let (public_key, private_key) = bfv::generate_keypair(&self.user_params)?;
        Ok(Keypair {
            public_key: Bytes::from(public_key),
            private_key: Bytes::from(private_key),
        })
    }

    fn eip712_domain(&self) -> Eip712Domain {
        decryption_domain(self.chain_id, self.kms_verifier)
    }

    async fn user_decrypt(
        &self,
        pairs: &[HandleContractPair],
        signature: &DecryptionSignature,
    ) -> Result<HashMap<CiphertextHandle, U256>, FhevmError> {
        let contracts: Vec<Address> = pairs.iter().map(|p| p.contract_address).collect();
        if !signature.covers(&contracts) || !signature.is_valid_at(unix_now()) {
            return Err(FhevmError::Decryption(
                "decryption signature is expired or does not cover the contracts".to_string(),
            ));
        }
        if signature.chain_id != self.chain_id {
            return Err(FhevmError::Decryption(format!(
                "decryption signature was made for chain {} not {}",
                signature.chain_id, self.chain_id
            )));
        }

        let request = UserDecryptRequest {
            handle_contract_pairs: pairs,
            request_validity: RequestValidity {
                start_timestamp: signature.start_timestamp.to_string(),
                duration_days: signature.duration_days.to_string(),
            },
            contracts_chain_id: self.chain_id,
            gateway_chain_id: self.gateway_chain_id,
            contract_addresses: &signature.contract_addresses,
            user_address: signature.user_address,
            signature: &signature.signature,
            public_key: &signature.public_key,
        };

        let response: UserDecryptResponse = self
            .client
            .post(self.endpoint("user-decrypt"))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        open_reencrypted(&self.user_params, &signature.private_key, pairs, response)
    }
}
