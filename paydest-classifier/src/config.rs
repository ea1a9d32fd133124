//! Classifier configuration

use std::env;

use serde::{Deserialize, Serialize};

use crate::Network;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Restrict accepted destinations to one network
pub const NETWORK_ENV: &str = "PAYDEST_NETWORK";

/// Accept `bitcoin:` / `lightning:` URIs (`true`/`false`)
pub const ALLOW_URI_SCHEMES_ENV: &str = "PAYDEST_ALLOW_URI_SCHEMES";

/// Accept `pubkey@host:port` connection strings (`true`/`false`)
pub const ALLOW_CONNECTION_STRINGS_ENV: &str = "PAYDEST_ALLOW_CONNECTION_STRINGS";

/// Which schemes and networks the classifier accepts.
///
/// The default accepts every supported scheme on every network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Only accept destinations payable from this network. `None` accepts all.
    pub network: Option<Network>,
    /// Accept `bitcoin:` and `lightning:` URIs
    pub allow_uri_schemes: bool,
    /// Accept `<pubkey>@<host>[:<port>]` as a node destination
    pub allow_connection_strings: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            network: None,
            allow_uri_schemes: true,
            allow_connection_strings: true,
        }
    }
}

impl ClassifierConfig {
    /// Build a configuration from `PAYDEST_*` environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            network: env::var(NETWORK_ENV)
                .ok()
                .and_then(|s| Network::from_str(&s)),
            allow_uri_schemes: env::var(ALLOW_URI_SCHEMES_ENV)
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.allow_uri_schemes),
            allow_connection_strings: env::var(ALLOW_CONNECTION_STRINGS_ENV)
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.allow_connection_strings),
        }
    }

    /// Restrict to a single network
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Enable or disable URI schemes
    pub fn with_uri_schemes(mut self, allow: bool) -> Self {
        self.allow_uri_schemes = allow;
        self
    }

    /// Enable or disable connection strings
    pub fn with_connection_strings(mut self, allow: bool) -> Self {
        self.allow_connection_strings = allow;
        self
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
