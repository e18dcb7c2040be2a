// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

/// Failures surfaced to the error slot. Each variant carries the underlying diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailure(String),

    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    #[error("Could not obtain a decryption signature: {0}")]
    AuthorizationUnavailable(String),

    /// The contract refused the transaction. Never retried.
    #[error("Transaction rejected: {0}")]
    ChainRejected(String),

    #[error("Chain read failed: {0}")]
    ChainRead(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailure(String),
}

impl QuizError {
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::NotReady(_) => "not_ready",
            QuizError::EncryptionFailure(_) => "encryption_failure",
            QuizError::SignerUnavailable(_) => "signer_unavailable",
            QuizError::AuthorizationUnavailable(_) => "authorization_unavailable",
            QuizError::ChainRejected(_) => "chain_rejected",
            QuizError::ChainRead(_) => "chain_read",
            QuizError::DecryptionFailure(_) => "decryption_failure",
        }
    }

    pub(crate) fn rejected(err: impl std::fmt::Display) -> Self {
        QuizError::ChainRejected(format!("{err:#}"))
    }

    pub(crate) fn read(err: impl std::fmt::Display) -> Self {
        QuizError::ChainRead(format!("{err:#}"))
    }
}
