//! Lightning node public keys and connection strings

use k256::PublicKey;
use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Length of a compressed secp256k1 public key in bytes
pub const NODE_ID_LEN: usize = 33;

/// Length of a hex-encoded node id
pub const NODE_ID_HEX_LEN: usize = NODE_ID_LEN * 2;

/// A compressed secp256k1 public key identifying a Lightning node
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId([u8; NODE_ID_LEN]);

impl NodeId {
    /// Wrap raw bytes after checking they encode a point on the curve
    pub fn from_bytes(bytes: [u8; NODE_ID_LEN]) -> Result<Self> {
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(Error::InvalidNodeKey(format!(
                "compressed key must start with 0x02 or 0x03, got 0x{:02x}",
                bytes[0]
            )));
        }
        PublicKey::from_sec1_bytes(&bytes)
            .map_err(|_| Error::InvalidNodeKey("not a point on secp256k1".to_string()))?;
        Ok(Self(bytes))
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.to_hex())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A node to pay, optionally with the address it can be reached at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTarget {
    /// The node's public key
    pub node_id: NodeId,
    /// `host:port` (or bare host) from a connection string
    pub socket_addr: Option<String>,
}

/// Parse a bare hex-encoded compressed public key.
///
/// Both lowercase and uppercase hex are accepted.
pub fn parse_node_pubkey(s: &str) -> Result<NodeId> {
    if s.len() != NODE_ID_HEX_LEN {
        return Err(Error::InvalidNodeKey(format!(
            "expected {} hex characters, got {}",
            NODE_ID_HEX_LEN,
            s.len()
        )));
    }
    let mut bytes = [0u8; NODE_ID_LEN];
    hex::decode_to_slice(s, &mut bytes)?;
    NodeId::from_bytes(bytes)
}

/// Parse `<pubkey>@<host>[:<port>]`. IPv6 hosts must be bracketed.
pub fn parse_connection_string(s: &str) -> Result<NodeTarget> {
    let (key, socket_addr) = s
        .split_once('@')
        .ok_or_else(|| Error::InvalidConnectionString("missing '@'".to_string()))?;

    let node_id = parse_node_pubkey(key)?;
    validate_socket_addr(socket_addr)?;

    Ok(NodeTarget {
        node_id,
        socket_addr: Some(socket_addr.to_string()),
    })
}

fn validate_socket_addr(addr: &str) -> Result<()> {
    if addr.is_empty() {
        return Err(Error::InvalidConnectionString("empty host".to_string()));
    }
    if addr.chars().any(|c| c.is_whitespace() || c.is_control() || c == '@' || c == '/') {
        return Err(Error::InvalidConnectionString(
            "host contains an invalid character".to_string(),
        ));
    }

    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(|| {
            Error::InvalidConnectionString("unterminated IPv6 host".to_string())
        })?;
        let port = match after {
            "" => None,
            _ => Some(after.strip_prefix(':').ok_or_else(|| {
                Error::InvalidConnectionString("expected ':' after IPv6 host".to_string())
            })?),
        };
        (host, port)
    } else {
        match addr.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (addr, None),
        }
    };

    if host.is_empty() {
        return Err(Error::InvalidConnectionString("empty host".to_string()));
    }
    if !addr.starts_with('[') && host.contains(':') {
        return Err(Error::InvalidConnectionString(
            "IPv6 hosts must be bracketed".to_string(),
        ));
    }
    if let Some(port) = port {
        match port.parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => {
                return Err(Error::InvalidConnectionString(format!(
                    "invalid port: {}",
                    port
                )))
            }
        }
    }
    Ok(())
}
