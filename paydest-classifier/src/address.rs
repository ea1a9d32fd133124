//! On-chain Bitcoin address validation
//!
//! Two encodings are recognized:
//!
//! - **Segwit** (BIP 173 / BIP 350): `bc1...`, `tb1...`, `bcrt1...`. Version 0
//!   programs use the Bech32 checksum, version 1 and above use Bech32m.
//! - **Base58Check** (legacy): P2PKH (`1...`, `m...`/`n...`) and P2SH
//!   (`3...`, `2...`).
//!
//! Only the encoding is checked. Whether an address has ever been used, or
//! belongs to anyone, is not knowable without a chain lookup.

use serde::{Deserialize, Serialize};

use crate::{Error, Network, Result};

/// Base58 version byte for mainnet P2PKH
pub const P2PKH_MAINNET_VERSION: u8 = 0x00;

/// Base58 version byte for mainnet P2SH
pub const P2SH_MAINNET_VERSION: u8 = 0x05;

/// Base58 version byte for testnet/signet/regtest P2PKH
pub const P2PKH_TESTNET_VERSION: u8 = 0x6f;

/// Base58 version byte for testnet/signet/regtest P2SH
pub const P2SH_TESTNET_VERSION: u8 = 0xc4;

/// Longest valid segwit address (BIP 173)
pub const MAX_SEGWIT_ADDRESS_LEN: usize = 90;

const BASE58_PAYLOAD_LEN: usize = 21;
const BASE58_MIN_LEN: usize = 26;
const BASE58_MAX_LEN: usize = 35;
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Output script type an address pays to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AddressType {
    /// Pay to public key hash (legacy)
    P2pkh,
    /// Pay to script hash (legacy)
    P2sh,
    /// Segwit v0 pay to witness public key hash
    P2wpkh,
    /// Segwit v0 pay to witness script hash
    P2wsh,
    /// Segwit v1 pay to taproot
    P2tr,
    /// A segwit version or program length with no assigned meaning yet
    WitnessUnknown { version: u8 },
}

impl AddressType {
    /// Whether this address uses the legacy Base58Check encoding
    pub fn is_base58(&self) -> bool {
        matches!(self, AddressType::P2pkh | AddressType::P2sh)
    }
}

/// A syntactically valid on-chain address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainAddress {
    /// Network the encoding belongs to. Test networks that share an encoding
    /// are reported as [`Network::Testnet`].
    pub network: Network,
    /// Script type
    pub address_type: AddressType,
}

impl OnChainAddress {
    /// Whether a wallet running on `network` can pay to this address
    pub fn is_valid_for(&self, network: Network) -> bool {
        match self.network {
            Network::Bitcoin => network == Network::Bitcoin,
            Network::Regtest => network == Network::Regtest,
            Network::Testnet | Network::Signet => match network {
                Network::Testnet | Network::Signet => true,
                Network::Regtest => self.address_type.is_base58(),
                Network::Bitcoin => false,
            },
        }
    }
}

/// Parse an address in either encoding
pub fn parse_address(s: &str) -> Result<OnChainAddress> {
    if s.is_empty() {
        return Err(Error::Empty);
    }
    if s.contains('1') && !s.starts_with('1') {
        if let Ok(address) = parse_segwit_address(s) {
            return Ok(address);
        }
    }
    parse_base58_address(s)
}

/// Parse a Bech32/Bech32m segwit address
pub fn parse_segwit_address(s: &str) -> Result<OnChainAddress> {
    if s.len() > MAX_SEGWIT_ADDRESS_LEN {
        return Err(Error::InvalidAddress(format!(
            "segwit address longer than {} characters",
            MAX_SEGWIT_ADDRESS_LEN
        )));
    }

    // Checks checksum variant per version, program length and case.
    let (hrp, version, program) = bech32::segwit::decode(s)?;

    let hrp = hrp.to_lowercase();
    let network = match hrp.as_str() {
        "bc" => Network::Bitcoin,
        "tb" => Network::Testnet,
        "bcrt" => Network::Regtest,
        _ => return Err(Error::UnknownHrp(hrp)),
    };

    let version = version.to_u8();
    let address_type = match (version, program.len()) {
        (0, 20) => AddressType::P2wpkh,
        (0, 32) => AddressType::P2wsh,
        (0, len) => {
            return Err(Error::InvalidAddress(format!(
                "invalid v0 witness program length {}",
                len
            )))
        }
        (1, 32) => AddressType::P2tr,
        (version, _) => AddressType::WitnessUnknown { version },
    };

    Ok(OnChainAddress {
        network,
        address_type,
    })
}

/// Parse a Base58Check P2PKH/P2SH address
pub fn parse_base58_address(s: &str) -> Result<OnChainAddress> {
    if !(BASE58_MIN_LEN..=BASE58_MAX_LEN).contains(&s.len()) {
        return Err(Error::InvalidAddress(format!(
            "base58 address must be {}-{} characters, got {}",
            BASE58_MIN_LEN,
            BASE58_MAX_LEN,
            s.len()
        )));
    }
    if !s.chars().all(|c| BASE58_ALPHABET.contains(c)) {
        return Err(Error::InvalidAddress(
            "character outside the base58 alphabet".to_string(),
        ));
    }

    // `with_check` verifies the double-SHA256 checksum and strips it.
    let payload = bs58::decode(s).with_check(None).into_vec()?;
    if payload.len() != BASE58_PAYLOAD_LEN {
        return Err(Error::InvalidAddress(format!(
            "expected {} byte payload, got {}",
            BASE58_PAYLOAD_LEN,
            payload.len()
        )));
    }

    let (network, address_type) = match payload[0] {
        P2PKH_MAINNET_VERSION => (Network::Bitcoin, AddressType::P2pkh),
        P2SH_MAINNET_VERSION => (Network::Bitcoin, AddressType::P2sh),
        P2PKH_TESTNET_VERSION => (Network::Testnet, AddressType::P2pkh),
        P2SH_TESTNET_VERSION => (Network::Testnet, AddressType::P2sh),
        other => {
            return Err(Error::InvalidAddress(format!(
                "unknown version byte 0x{:02x}",
                other
            )))
        }
    };

    Ok(OnChainAddress {
        network,
        address_type,
    })
}
