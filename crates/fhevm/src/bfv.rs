// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! BFV helpers for the relayer-backed capability: encrypting answers under the network key and
//! the ephemeral keypair used to receive re-encrypted results.

use crate::FhevmError;
use fhe::bfv::{
    BfvParameters, BfvParametersBuilder, Ciphertext, Encoding, Plaintext, PublicKey, SecretKey,
};
use fhe_traits::{
    Deserialize, DeserializeParametrized, FheDecoder, FheDecrypter, FheEncoder, FheEncrypter,
    Serialize,
};
use quiz_config::BfvConfig;
use rand::thread_rng;
use std::sync::Arc;
use zeroize::Zeroize;

/// Build parameters from configuration
pub fn build_params(config: &BfvConfig) -> Result<Arc<BfvParameters>, FhevmError> {
    BfvParametersBuilder::new()
        .set_degree(config.degree)
        .set_plaintext_modulus(config.plaintext_modulus)
        .set_moduli(&config.moduli)
        .build_arc()
        .map_err(|e| FhevmError::Unavailable(format!("Invalid BFV parameters: {e}")))
}

/// Decode parameters published alongside a network key
pub fn decode_params(bytes: &[u8]) -> Result<Arc<BfvParameters>, FhevmError> {
    BfvParameters::try_deserialize(bytes)
        .map(Arc::new)
        .map_err(|e| FhevmError::Unavailable(format!("Error deserializing BFV parameters: {e}")))
}

pub fn encode_params(params: &BfvParameters) -> Vec<u8> {
    params.to_bytes()
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SecretKeyData {
    coeffs: Box<[i64]>,
}

/// Serialized `(public_key, secret_key)`. The secret is bincode of the key coefficients.
pub fn generate_keypair(params: &Arc<BfvParameters>) -> Result<(Vec<u8>, Vec<u8>), FhevmError> {
    let mut rng = thread_rng();
    let sk = SecretKey::random(params, &mut rng);
    let pk = PublicKey::new(&sk, &mut rng);
    let secret = bincode::serialize(&SecretKeyData {
        coeffs: sk.coeffs.clone(),
    })
    .map_err(|e| FhevmError::Encryption(format!("Error serializing secret key: {e}")))?;
    Ok((pk.to_bytes(), secret))
}

fn secret_key_from_bytes(
    bytes: &[u8],
    params: &Arc<BfvParameters>,
) -> Result<SecretKey, FhevmError> {
    let mut data: SecretKeyData = bincode::deserialize(bytes)
        .map_err(|e| FhevmError::Decryption(format!("Error deserializing secret key: {e}")))?;
    let sk = SecretKey::new(data.coeffs.to_vec(), params);
    data.coeffs.zeroize();
    Ok(sk)
}

/// Encrypt one 32 bit value under a serialized public key
pub fn encrypt_u32(
    params: &Arc<BfvParameters>,
    public_key: &[u8],
    value: u32,
) -> Result<Vec<u8>, FhevmError> {
    let pk = PublicKey::from_bytes(public_key, params)
        .map_err(|e| FhevmError::Encryption(format!("Error deserializing public key: {e}")))?;

    if u64::from(value) >= params.plaintext() {
        return Err(FhevmError::InvalidInput(format!(
            "{value} does not fit the plaintext modulus"
        )));
    }

    let input = vec![u64::from(value)];
    let pt = Plaintext::try_encode(&input, Encoding::poly(), params)?;
    let ct = pk.try_encrypt(&pt, &mut thread_rng())?;
    Ok(ct.to_bytes())
}

/// Decrypt a ciphertext produced for the serialized secret key and return its first slot
pub fn decrypt_u64(
    params: &Arc<BfvParameters>,
    secret_key: &[u8],
    ciphertext: &[u8],
) -> Result<u64, FhevmError> {
    let sk = secret_key_from_bytes(secret_key, params)?;
    let ct = Ciphertext::from_bytes(ciphertext, params)
        .map_err(|e| FhevmError::Decryption(format!("Error deserializing ciphertext: {e}")))?;
    let pt = sk
        .try_decrypt(&ct)
        .map_err(|e| FhevmError::Decryption(e.to_string()))?;
    let decoded = Vec::<u64>::try_decode(&pt, Encoding::poly())
        .map_err(|e| FhevmError::Decryption(format!("Plaintext decoding failed: {e}")))?;
    decoded
        .first()
        .copied()
        .ok_or_else(|| FhevmError::Decryption("empty plaintext".to_string()))
}
