//! Send-Intent Controller
//!
//! Turns the text a user entered on the send screen into one decision:
//! proceed to amount entry, or stay and show a rejection.
//!
//! ```text
//! text ──► classify ──► Invoice        ──► Reject(UnsupportedInvoice)
//!                  ├──► Unknown        ──► Reject(UnparseableDestination)
//!                  └──► Address / Node ──► Proceed { destination: text, kind }
//! ```
//!
//! Empty text is rejected with `EmptyInput` before classification. The
//! destination carried by a proceed is the exact entered text; normalization
//! is left to later stages.
//!
//! # Example
//!
//! ```
//! use paydest_intent::{decide, PayableKind, RejectionReason, SendIntent};
//!
//! let key = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
//! assert_eq!(
//!     decide(key),
//!     SendIntent::Proceed { destination: key.to_string(), kind: PayableKind::NodePublicKey }
//! );
//! assert_eq!(decide("").rejection(), Some(RejectionReason::EmptyInput));
//! ```

mod handoff;
mod intent;
mod reason;

pub use handoff::{AmountEntryHandoff, HandoffError};
pub use intent::{decide, PayableKind, SendIntent, SendIntentController};
pub use reason::RejectionReason;
