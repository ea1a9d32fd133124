//! The send-intent decision table.
//!
//! | Input                    | Outcome                                  |
//! |--------------------------|------------------------------------------|
//! | empty string             | `Reject(EmptyInput)`                     |
//! | classifies as `Invoice`  | `Reject(UnsupportedInvoice)`             |
//! | classifies as `Unknown`  | `Reject(UnparseableDestination)`         |
//! | address or node key      | `Proceed { destination: text, kind }`    |
//!
//! The input is not trimmed. `"   "` is not empty; it is unparseable.

use paydest_classifier::{Classifier, ClassifierConfig, DestinationKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AmountEntryHandoff, RejectionReason};

/// The destination kinds a send can proceed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayableKind {
    /// Bitcoin address
    OnChainAddress,
    /// Lightning node public key
    NodePublicKey,
}

impl PayableKind {
    /// Get string representation (matches [`DestinationKind::as_str`])
    pub fn as_str(&self) -> &'static str {
        DestinationKind::from(*self).as_str()
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "on_chain_address" => Some(PayableKind::OnChainAddress),
            "node_public_key" => Some(PayableKind::NodePublicKey),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<PayableKind> for DestinationKind {
    fn from(kind: PayableKind) -> Self {
        match kind {
            PayableKind::OnChainAddress => DestinationKind::OnChainAddress,
            PayableKind::NodePublicKey => DestinationKind::NodePublicKey,
        }
    }
}

impl TryFrom<DestinationKind> for PayableKind {
    type Error = DestinationKind;

    fn try_from(kind: DestinationKind) -> Result<Self, Self::Error> {
        match kind {
            DestinationKind::OnChainAddress => Ok(PayableKind::OnChainAddress),
            DestinationKind::NodePublicKey => Ok(PayableKind::NodePublicKey),
            other => Err(other),
        }
    }
}

/// What the send flow should do with the entered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendIntent {
    /// Continue to amount entry with this destination
    Proceed {
        /// Exactly the text that was entered
        destination: String,
        kind: PayableKind,
    },
    /// Stay on the destination screen and tell the user why
    Reject { reason: RejectionReason },
}

impl SendIntent {
    pub fn is_proceed(&self) -> bool {
        matches!(self, SendIntent::Proceed { .. })
    }

    /// The rejection reason, if this is a rejection
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            SendIntent::Reject { reason } => Some(*reason),
            SendIntent::Proceed { .. } => None,
        }
    }

    /// The payload for the amount-entry stage, if this is a proceed
    pub fn handoff(&self) -> Option<AmountEntryHandoff> {
        match self {
            SendIntent::Proceed { destination, kind } => Some(AmountEntryHandoff {
                destination: destination.clone(),
                kind: *kind,
            }),
            SendIntent::Reject { .. } => None,
        }
    }
}

/// Applies the send policy to user input.
///
/// Stateless between calls; clone or share it across threads.
#[derive(Debug, Clone, Default)]
pub struct SendIntentController {
    classifier: Classifier,
}

impl SendIntentController {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self::new(Classifier::new(config))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Decide whether the send can proceed with `text`
    pub fn decide(&self, text: &str) -> SendIntent {
        if text.is_empty() {
            return reject(RejectionReason::EmptyInput);
        }

        let kind = self.classifier.classify(text);
        match PayableKind::try_from(kind) {
            Ok(kind) => {
                debug!(outcome = "proceed", kind = kind.as_str(), "send destination accepted");
                SendIntent::Proceed {
                    destination: text.to_string(),
                    kind,
                }
            }
            Err(DestinationKind::Invoice) => reject(RejectionReason::UnsupportedInvoice),
            Err(_) => reject(RejectionReason::UnparseableDestination),
        }
    }
}

fn reject(reason: RejectionReason) -> SendIntent {
    debug!(outcome = "reject", reason = reason.code(), "send destination rejected");
    SendIntent::Reject { reason }
}

/// Decide with the default classifier configuration
pub fn decide(text: &str) -> SendIntent {
    SendIntentController::default().decide(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydest_classifier::Network;

    const NODE_KEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const P2WPKH: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
    const P2WSH_TESTNET: &str = "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7";

    #[test]
    fn test_empty_input() {
        assert_eq!(
            decide(""),
            SendIntent::Reject {
                reason: RejectionReason::EmptyInput
            }
        );
    }

    #[test]
    fn test_whitespace_only_is_not_empty() {
        assert_eq!(
            decide("  ").rejection(),
            Some(RejectionReason::UnparseableDestination)
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            decide("not-a-real-thing-12345").rejection(),
            Some(RejectionReason::UnparseableDestination)
        );
    }

    #[test]
    fn test_proceed_with_node_key() {
        let intent = decide(NODE_KEY);
        assert!(intent.is_proceed());
        assert_eq!(
            intent,
            SendIntent::Proceed {
                destination: NODE_KEY.to_string(),
                kind: PayableKind::NodePublicKey,
            }
        );
    }

    #[test]
    fn test_proceed_with_address() {
        assert_eq!(
            decide(P2WPKH),
            SendIntent::Proceed {
                destination: P2WPKH.to_string(),
                kind: PayableKind::OnChainAddress,
            }
        );
    }

    #[test]
    fn test_configured_network() {
        let controller = SendIntentController::with_config(
            ClassifierConfig::default().with_network(Network::Bitcoin),
        );
        assert!(controller.decide(P2WPKH).is_proceed());
        assert_eq!(
            controller.decide(P2WSH_TESTNET).rejection(),
            Some(RejectionReason::UnparseableDestination)
        );
    }

    #[test]
    fn test_kind_conversions() {
        for kind in DestinationKind::ALL {
            match PayableKind::try_from(kind) {
                Ok(payable) => assert_eq!(DestinationKind::from(payable), kind),
                Err(rejected) => {
                    assert!(matches!(
                        rejected,
                        DestinationKind::Invoice | DestinationKind::Unknown
                    ))
                }
            }
        }
        assert_eq!(
            PayableKind::from_str("node_public_key"),
            Some(PayableKind::NodePublicKey)
        );
        assert_eq!(PayableKind::from_str("invoice"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(decide(NODE_KEY)).unwrap();
        assert_eq!(json["outcome"], "proceed");
        assert_eq!(json["kind"], "node_public_key");
        assert_eq!(json["destination"], NODE_KEY);

        let json = serde_json::to_value(decide("")).unwrap();
        assert_eq!(json["outcome"], "reject");
        assert_eq!(json["reason"], "empty_input");
    }
}
