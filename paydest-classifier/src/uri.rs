//! `bitcoin:` (BIP 21) and `lightning:` payment URIs
//!
//! ```text
//! bitcoin:bc1q...?amount=0.001&label=coffee
//! lightning:lnbc2500u1...
//! ```
//!
//! Scheme names are matched case-insensitively. Only the destination part is
//! validated; BIP 21 query parameters are left to the amount-entry stage.

use crate::{
    address::{parse_address, OnChainAddress},
    invoice::{parse_invoice, InvoiceSummary},
    Error, Result,
};

/// BIP 21 URI scheme
pub const BITCOIN_SCHEME: &str = "bitcoin";

/// Lightning URI scheme
pub const LIGHTNING_SCHEME: &str = "lightning";

/// Return the text after `<scheme>:` if `s` starts with it
pub fn strip_scheme<'a>(s: &'a str, scheme: &str) -> Option<&'a str> {
    let (head, rest) = s.split_once(':')?;
    head.eq_ignore_ascii_case(scheme).then_some(rest)
}

/// Parse the address out of a `bitcoin:` URI
pub fn parse_bitcoin_uri(s: &str) -> Result<OnChainAddress> {
    let body = strip_scheme(s, BITCOIN_SCHEME)
        .ok_or_else(|| Error::InvalidAddress("missing bitcoin: scheme".to_string()))?;
    let address = match body.split_once('?') {
        Some((address, _params)) => address,
        None => body,
    };
    parse_address(address)
}

/// Parse the invoice out of a `lightning:` URI
pub fn parse_lightning_uri(s: &str) -> Result<InvoiceSummary> {
    let body = strip_scheme(s, LIGHTNING_SCHEME)
        .ok_or_else(|| Error::InvalidInvoice("missing lightning: scheme".to_string()))?;
    parse_invoice(body)
}
