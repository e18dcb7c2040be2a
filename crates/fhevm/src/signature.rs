// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FhevmError, UserDecryptRequestVerification};
use alloy::{
    primitives::{Address, Bytes, Signature, U256},
    sol_types::{Eip712Domain, SolStruct},
};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Signed, time-bounded grant to decrypt handles of `contract_addresses` for `user_address`.
///
/// The signature is made over the decryption domain of `chain_id` and does not verify on any
/// other chain. Persisted as camelCase json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptionSignature {
    pub private_key: Bytes,
    pub public_key: Bytes,
    pub signature: Bytes,
    pub contract_addresses: Vec<Address>,
    pub user_address: Address,
    pub chain_id: u64,
    pub start_timestamp: u64,
    pub duration_days: u64,
}

impl DecryptionSignature {
    pub fn expires_at(&self) -> u64 {
        self.start_timestamp
            .saturating_add(self.duration_days.saturating_mul(SECONDS_PER_DAY))
    }

    /// `now` in `[start, start + days * 86400)`
    pub fn is_valid_at(&self, now: u64) -> bool {
        now >= self.start_timestamp && now < self.expires_at()
    }

    /// The grant names every address in `contracts`
    pub fn covers(&self, contracts: &[Address]) -> bool {
        contracts
            .iter()
            .all(|c| self.contract_addresses.contains(c))
    }

    /// Usable by `user` on `chain_id` for `contracts` at `now`
    pub fn is_valid_for(
        &self,
        user: &Address,
        chain_id: u64,
        contracts: &[Address],
        now: u64,
    ) -> bool {
        self.user_address == *user
            && self.chain_id == chain_id
            && self.covers(contracts)
            && self.is_valid_at(now)
    }

    /// The typed-data message this grant signs
    pub fn request(&self) -> UserDecryptRequestVerification {
        UserDecryptRequestVerification {
            publicKey: self.public_key.clone(),
            contractAddresses: self.contract_addresses.clone(),
            startTimestamp: U256::from(self.start_timestamp),
            durationDays: U256::from(self.duration_days),
        }
    }

    /// Address that produced `signature` over this grant
    pub fn recover_signer(&self, domain: &Eip712Domain) -> Result<Address, FhevmError> {
        let signature = Signature::try_from(self.signature.as_ref())
            .map_err(|e| FhevmError::Decryption(format!("malformed grant signature: {e}")))?;
        let hash = self.request().eip712_signing_hash(domain);
        signature
            .recover_address_from_prehash(&hash)
            .map_err(|e| FhevmError::Decryption(format!("unrecoverable grant signature: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const GAME: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const BOARD: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
    const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn grant(start: u64, days: u64) -> DecryptionSignature {
        DecryptionSignature {
            private_key: Bytes::from(vec![1]),
            public_key: Bytes::from(vec![2]),
            signature: Bytes::from(vec![3]),
            contract_addresses: vec![GAME],
            user_address: USER,
            chain_id: 31337,
            start_timestamp: start,
            duration_days: days,
        }
    }

    #[test]
    fn test_validity_window() {
        let t = 1_700_000_000;
        let d = 365;
        let sig = grant(t, d);

        assert!(!sig.is_valid_at(t - 1));
        assert!(sig.is_valid_at(t));
        assert!(sig.is_valid_at(t + SECONDS_PER_DAY * d - 1));
        assert!(!sig.is_valid_at(t + SECONDS_PER_DAY * d));
        assert!(!sig.is_valid_at(t + SECONDS_PER_DAY * d + 1));
    }

    #[test]
    fn test_expired_after_four_hundred_days() {
        let now = 1_760_000_000;
        let sig = grant(now - 400 * SECONDS_PER_DAY, 365);
        assert!(!sig.is_valid_at(now));
    }

    #[test]
    fn test_user_and_contract_coverage() {
        let now = 1_700_000_100;
        let sig = grant(1_700_000_000, 1);

        assert!(sig.is_valid_for(&USER, 31337, &[GAME], now));
        assert!(sig.is_valid_for(&USER, 31337, &[], now));
        assert!(!sig.is_valid_for(&USER, 31337, &[GAME, BOARD], now));
        assert!(!sig.is_valid_for(&Address::ZERO, 31337, &[GAME], now));
    }

    #[test]
    fn test_grant_is_bound_to_its_chain() {
        let now = 1_700_000_100;
        let sig = grant(1_700_000_000, 1);

        assert!(sig.is_valid_for(&USER, 31337, &[GAME], now));
        assert!(!sig.is_valid_for(&USER, 11155111, &[GAME], now));
    }

    #[test]
    fn test_json_layout() -> Result<(), serde_json::Error> {
        let raw = serde_json::to_value(grant(10, 365))?;
        for field in [
            "privateKey",
            "publicKey",
            "signature",
            "contractAddresses",
            "userAddress",
            "chainId",
            "startTimestamp",
            "durationDays",
        ] {
            assert!(raw.get(field).is_some(), "missing {field}");
        }
        assert_eq!(raw["publicKey"], "0x02");
        Ok(())
    }
}
