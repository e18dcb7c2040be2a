// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FhevmError {
    #[error("Encryption capability unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid encrypted input: {0}")]
    InvalidInput(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Relayer request failed: {0}")]
    Relayer(String),
    #[error("Signer rejected the request: {0}")]
    SignerRejected(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for FhevmError {
    fn from(value: reqwest::Error) -> Self {
        FhevmError::Relayer(value.to_string())
    }
}

impl From<fhe::Error> for FhevmError {
    fn from(value: fhe::Error) -> Self {
        FhevmError::Encryption(value.to_string())
    }
}
