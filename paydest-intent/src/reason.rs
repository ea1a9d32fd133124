//! Why a send was refused.

use serde::{Deserialize, Serialize};

/// Machine-distinguishable rejection reasons.
///
/// Callers localize on the variant (or its [`code`](Self::code)), never on
/// the English [`message`](Self::message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Nothing was entered
    EmptyInput,
    /// A recognized invoice; paying invoices is not available yet
    UnsupportedInvoice,
    /// The text matches no recognized destination scheme
    UnparseableDestination,
}

impl RejectionReason {
    /// Every reason
    pub const ALL: [RejectionReason; 3] = [
        RejectionReason::EmptyInput,
        RejectionReason::UnsupportedInvoice,
        RejectionReason::UnparseableDestination,
    ];

    /// Stable identifier for logs and telemetry
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::EmptyInput => "empty_input",
            RejectionReason::UnsupportedInvoice => "unsupported_invoice",
            RejectionReason::UnparseableDestination => "unparseable_destination",
        }
    }

    /// Default English message for a transient notification
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::EmptyInput => "Enter a destination to send to.",
            RejectionReason::UnsupportedInvoice => {
                "Paying Lightning invoices is not supported yet."
            }
            RejectionReason::UnparseableDestination => {
                "That doesn't look like an address or node key we can send to."
            }
        }
    }

    /// Look a reason up by its [`code`](Self::code)
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.code() == code)
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
