//! Bitcoin network selection

use serde::{Deserialize, Serialize};

/// Bitcoin network a destination belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet
    #[default]
    Bitcoin,
    /// Bitcoin testnet (testnet3/testnet4)
    Testnet,
    /// Signet
    Signet,
    /// Local regression-test network
    Regtest,
}

impl Network {
    /// All networks, mainnet first
    pub const ALL: [Network; 4] = [
        Network::Bitcoin,
        Network::Testnet,
        Network::Signet,
        Network::Regtest,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bitcoin" | "mainnet" | "main" => Some(Network::Bitcoin),
            "testnet" | "test" => Some(Network::Testnet),
            "signet" => Some(Network::Signet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Segwit address HRP for this network
    pub fn segwit_hrp(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bc",
            Network::Testnet | Network::Signet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    /// BOLT 11 currency prefix for this network
    pub fn invoice_currency(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bc",
            Network::Testnet => "tb",
            Network::Signet => "tbs",
            Network::Regtest => "bcrt",
        }
    }

    /// Detect network from a BOLT 11 currency prefix
    pub fn from_invoice_currency(currency: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|network| network.invoice_currency() == currency)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parsing() {
        assert_eq!(Network::from_str("mainnet"), Some(Network::Bitcoin));
        assert_eq!(Network::from_str("Bitcoin"), Some(Network::Bitcoin));
        assert_eq!(Network::from_str("TESTNET"), Some(Network::Testnet));
        assert_eq!(Network::from_str("signet"), Some(Network::Signet));
        assert_eq!(Network::from_str("regtest"), Some(Network::Regtest));
        assert_eq!(Network::from_str("liquid"), None);
    }

    #[test]
    fn test_invoice_currency_lookup() {
        for network in Network::ALL {
            assert_eq!(
                Network::from_invoice_currency(network.invoice_currency()),
                Some(network)
            );
        }
        assert_eq!(Network::from_invoice_currency("ltc"), None);
    }

    #[test]
    fn test_signet_shares_testnet_hrp() {
        assert_eq!(Network::Signet.segwit_hrp(), Network::Testnet.segwit_hrp());
        assert_ne!(
            Network::Signet.invoice_currency(),
            Network::Testnet.invoice_currency()
        );
    }
}
