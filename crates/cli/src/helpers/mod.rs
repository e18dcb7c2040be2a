// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, bail, Result};
use zeroize::{Zeroize, Zeroizing};

pub mod output;
pub mod telemetry;

/// Environment variable holding the wallet's private key
pub const PRIVATE_KEY_ENV: &str = "QUIZ_PRIVATE_KEY";

/// Parse to a Zeroizing String
pub fn parse_zeroizing(s: &str) -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(s.to_string()))
}

/// Ensure hex is of the form 0x12435687abcdef...
pub fn ensure_hex_zeroizing(s: &str) -> Result<Zeroizing<String>> {
    parse_zeroizing(ensure_hex(s)?)
}

/// Ensure a hexadecimal number
fn ensure_hex(s: &str) -> Result<&str> {
    if !s.starts_with("0x") {
        bail!("hex value must start with '0x'")
    }
    if !s[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("private key must only contain hex characters [0-9a-fA-F]");
    }
    hex::decode(&s[2..])?.zeroize();
    Ok(s)
}

/// Wallet from a 0x prefixed private key
pub fn parse_wallet(s: &str) -> Result<PrivateKeySigner> {
    let key = ensure_hex_zeroizing(s.trim())?;
    Ok(key.parse::<PrivateKeySigner>()?)
}

/// Take the wallet key out of the environment. The variable is removed once read.
pub fn load_wallet() -> Result<Option<PrivateKeySigner>> {
    let Some(raw) = std::env::var_os(PRIVATE_KEY_ENV) else {
        return Ok(None);
    };
    std::env::remove_var(PRIVATE_KEY_ENV);

    let raw = Zeroizing::new(
        raw.into_string()
            .map_err(|_| anyhow!("{PRIVATE_KEY_ENV} is not valid unicode"))?,
    );
    parse_wallet(&raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_wallet() -> Result<()> {
        let wallet = parse_wallet(&format!("  {ANVIL_KEY}\n"))?;
        assert_eq!(
            wallet.address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        Ok(())
    }

    #[test]
    fn test_hex_validation() {
        assert!(ensure_hex_zeroizing(&ANVIL_KEY[2..]).is_err());
        assert!(ensure_hex_zeroizing("0xzz").is_err());
        assert!(ensure_hex_zeroizing("0xabc").is_err());
        assert!(ensure_hex_zeroizing("0xabcd").is_ok());
        assert!(parse_wallet("0xabcd").is_err());
    }
}
