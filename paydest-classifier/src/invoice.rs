//! Structural validation of BOLT 11 Lightning invoices
//!
//! ## Format
//!
//! ```text
//! ln <currency> [<amount><multiplier>] 1 <timestamp> <tagged fields...> <signature> <checksum>
//! ```
//!
//! The whole string is Bech32 (not Bech32m) without the 90 character limit
//! segwit addresses carry or the 1023 character Bech32 code length. The data
//! part is a sequence of 5-bit values: a 7 value timestamp, zero or more
//! tagged fields (`type`, 10 bit length, payload) and a 104 value recoverable
//! signature.
//!
//! Validity here is structural only. The signature is not checked against
//! the payee, and expiry is not compared against the clock.

use bech32::{
    primitives::{checksum::Checksum, decode::CheckedHrpstring, iter::Fe32IterExt},
    Fe32,
};
use serde::Serialize;

use crate::{Error, Network, NodeId, Result, MAX_INPUT_LEN};

/// Invoice human-readable parts start with this prefix
pub const INVOICE_PREFIX: &str = "ln";

/// Expiry assumed when the invoice has no `x` field
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;

/// Millisatoshis in one bitcoin
pub const MSAT_PER_BTC: u64 = 100_000_000_000;

const TIMESTAMP_LEN: usize = 7;
const SIGNATURE_LEN: usize = 104;
const CHECKSUM_LEN: usize = 6;
const PAYMENT_HASH_LEN: usize = 52;
const PAYEE_LEN: usize = 53;
// Longest field that still fits in a u64 (12 * 5 = 60 bits).
const MAX_INT_FIELD_LEN: usize = 12;

// Longest first so `tbs`/`bcrt` are not read as `tb`/`bc` plus an amount.
const CURRENCIES: [&str; 4] = ["bcrt", "tbs", "bc", "tb"];

/// The Bech32 checksum with the code length raised to the longest input we
/// inspect. Invoices with route hints routinely exceed Bech32's 1023.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceBech32 {}

impl Checksum for InvoiceBech32 {
    type MidstateRepr = u32;
    const CODE_LENGTH: usize = MAX_INPUT_LEN;
    const CHECKSUM_LENGTH: usize = CHECKSUM_LEN;
    const GENERATOR_SH: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    const TARGET_RESIDUE: u32 = 1;
}

/// The decoded, structurally valid parts of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    /// Network from the currency prefix
    pub network: Network,
    /// Requested amount, if the invoice fixes one
    pub amount_msat: Option<u64>,
    /// Creation time, seconds since the Unix epoch
    pub timestamp: u64,
    /// Lowercase hex payment hash
    pub payment_hash: String,
    /// Free-text description (`d` field)
    pub description: Option<String>,
    /// Seconds after `timestamp` the invoice stops being payable
    pub expiry_secs: u64,
    /// Explicit payee key (`n` field)
    pub payee: Option<NodeId>,
}

impl InvoiceSummary {
    /// Whether a wallet running on `network` could pay this invoice
    pub fn is_valid_for(&self, network: Network) -> bool {
        self.network == network
    }

    /// Unix time at which the invoice expires
    pub fn expires_at(&self) -> u64 {
        self.timestamp.saturating_add(self.expiry_secs)
    }
}

/// Parse and structurally validate a BOLT 11 invoice
pub fn parse_invoice(s: &str) -> Result<InvoiceSummary> {
    if s.is_empty() {
        return Err(Error::Empty);
    }
    if !s
        .get(..INVOICE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(INVOICE_PREFIX))
    {
        return Err(Error::InvalidInvoice("missing 'ln' prefix".to_string()));
    }

    // Validates charset, single case and the Bech32 checksum.
    let checked = CheckedHrpstring::new::<InvoiceBech32>(s)?;
    let hrp = checked.hrp().to_lowercase();
    let (network, amount_msat) = parse_hrp(&hrp)?;

    let separator = s
        .rfind('1')
        .ok_or_else(|| Error::InvalidInvoice("missing separator".to_string()))?;
    let data_part = &s[separator + 1..s.len() - CHECKSUM_LEN];
    let data = data_part
        .chars()
        .map(|c| Fe32::from_char(c.to_ascii_lowercase()))
        .collect::<std::result::Result<Vec<Fe32>, _>>()
        .map_err(|e| Error::Bech32(e.to_string()))?;

    if data.len() < TIMESTAMP_LEN + SIGNATURE_LEN {
        return Err(Error::InvalidInvoice(format!(
            "data part too short: {} characters",
            data.len()
        )));
    }

    let timestamp = fe32_to_u64(&data[..TIMESTAMP_LEN]);
    let (fields, signature) = data[TIMESTAMP_LEN..].split_at(data.len() - TIMESTAMP_LEN - SIGNATURE_LEN);

    let signature_bytes: Vec<u8> = signature.iter().copied().fes_to_bytes().collect();
    match signature_bytes.last() {
        Some(recovery_id) if *recovery_id <= 3 => {}
        _ => {
            return Err(Error::InvalidInvoice(
                "signature recovery id out of range".to_string(),
            ))
        }
    }

    let mut summary = InvoiceSummary {
        network,
        amount_msat,
        timestamp,
        payment_hash: String::new(),
        description: None,
        expiry_secs: DEFAULT_EXPIRY_SECS,
        payee: None,
    };
    parse_tagged_fields(fields, &mut summary)?;

    if summary.payment_hash.is_empty() {
        return Err(Error::InvalidInvoice("missing payment hash".to_string()));
    }
    Ok(summary)
}

fn parse_tagged_fields(mut fields: &[Fe32], summary: &mut InvoiceSummary) -> Result<()> {
    while !fields.is_empty() {
        if fields.len() < 3 {
            return Err(Error::InvalidInvoice("truncated tagged field".to_string()));
        }
        let tag = fields[0].to_char();
        let len = fields[1].to_u8() as usize * 32 + fields[2].to_u8() as usize;
        let rest = &fields[3..];
        if rest.len() < len {
            return Err(Error::InvalidInvoice(format!(
                "field '{}' overruns the data part",
                tag
            )));
        }
        let (payload, remaining) = rest.split_at(len);

        // Fields with an unexpected length are skipped, as readers are told to.
        match tag {
            'p' if len == PAYMENT_HASH_LEN => {
                let bytes: Vec<u8> = payload.iter().copied().fes_to_bytes().collect();
                summary.payment_hash = hex::encode(bytes);
            }
            'd' => {
                let bytes: Vec<u8> = payload.iter().copied().fes_to_bytes().collect();
                let description = String::from_utf8(bytes).map_err(|_| {
                    Error::InvalidInvoice("description is not valid UTF-8".to_string())
                })?;
                summary.description = Some(description);
            }
            'x' if (1..=MAX_INT_FIELD_LEN).contains(&len) => {
                summary.expiry_secs = fe32_to_u64(payload);
            }
            'n' if len == PAYEE_LEN => {
                let bytes: Vec<u8> = payload.iter().copied().fes_to_bytes().collect();
                let bytes: [u8; 33] = bytes
                    .try_into()
                    .map_err(|_| Error::InvalidInvoice("payee key length".to_string()))?;
                summary.payee = Some(NodeId::from_bytes(bytes)?);
            }
            _ => {}
        }

        fields = remaining;
    }
    Ok(())
}

/// Split `ln<currency><amount>` into network and amount
fn parse_hrp(hrp: &str) -> Result<(Network, Option<u64>)> {
    let rest = hrp
        .strip_prefix(INVOICE_PREFIX)
        .ok_or_else(|| Error::InvalidInvoice("missing 'ln' prefix".to_string()))?;

    let currency = CURRENCIES
        .iter()
        .find(|currency| rest.starts_with(*currency))
        .ok_or_else(|| Error::UnknownHrp(hrp.to_string()))?;
    let network = Network::from_invoice_currency(currency)
        .ok_or_else(|| Error::UnknownHrp(hrp.to_string()))?;

    let amount = &rest[currency.len()..];
    if amount.is_empty() {
        return Ok((network, None));
    }
    Ok((network, Some(parse_amount_msat(amount)?)))
}

/// Convert an HRP amount such as `2500u` to millisatoshis
fn parse_amount_msat(amount: &str) -> Result<u64> {
    let (digits, multiplier) = match amount.chars().last() {
        Some(c @ ('m' | 'u' | 'n' | 'p')) => (&amount[..amount.len() - 1], Some(c)),
        _ => (amount, None),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    if digits.starts_with('0') {
        return Err(Error::InvalidAmount(format!("leading zero: {}", amount)));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| Error::InvalidAmount(format!("overflow: {}", amount)))?;

    let msat = match multiplier {
        None => value.checked_mul(MSAT_PER_BTC),
        Some('m') => value.checked_mul(MSAT_PER_BTC / 1_000),
        Some('u') => value.checked_mul(MSAT_PER_BTC / 1_000_000),
        Some('n') => value.checked_mul(MSAT_PER_BTC / 1_000_000_000),
        Some(_) => {
            if value % 10 != 0 {
                return Err(Error::InvalidAmount(format!(
                    "sub-millisatoshi amount: {}",
                    amount
                )));
            }
            Some(value / 10)
        }
    };
    msat.ok_or_else(|| Error::InvalidAmount(format!("overflow: {}", amount)))
}

fn fe32_to_u64(values: &[Fe32]) -> u64 {
    values
        .iter()
        .fold(0u64, |acc, fe| (acc << 5) | u64::from(fe.to_u8()))
}
