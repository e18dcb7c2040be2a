// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;

pub struct StoreKeys;

fn lower(address: &Address) -> String {
    address.to_string().to_lowercase()
}

impl StoreKeys {
    /// Keyed by chain, user and the sorted, deduplicated contract set so that the same grant is
    /// found regardless of the order the contracts were requested in.
    pub fn decryption_signature(chain_id: u64, user: &Address, contracts: &[Address]) -> String {
        let mut contracts: Vec<String> = contracts.iter().map(lower).collect();
        contracts.sort();
        contracts.dedup();
        format!(
            "//decryption_signature/{}/{}/{}",
            chain_id,
            lower(user),
            contracts.join(",")
        )
    }

    pub fn public_key(acl: &Address) -> String {
        format!("//public_key/{}", lower(acl))
    }
}
