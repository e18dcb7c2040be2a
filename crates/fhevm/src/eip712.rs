// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::Eip712Domain,
};
use std::borrow::Cow;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct UserDecryptRequestVerification {
        bytes publicKey;
        address[] contractAddresses;
        uint256 startTimestamp;
        uint256 durationDays;
    }
}

/// Domain for decryption grants on `chain_id`, verified by the KMS verifier contract
pub fn decryption_domain(chain_id: u64, kms_verifier: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("Decryption")),
        Some(Cow::Borrowed("1")),
        Some(U256::from(chain_id)),
        Some(kms_verifier),
        None,
    )
}
