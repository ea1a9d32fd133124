//! Builds BOLT 11 shaped strings with valid checksums.
//!
//! Signatures are filler bytes: the classifier checks structure, not the
//! signer, so there is no need to sign anything here.

use anyhow::{anyhow, ensure, Context, Result};
use bech32::{
    primitives::iter::{ByteIterExt, Fe32IterExt},
    Bech32, Fe32, Hrp,
};

pub const DEFAULT_TIMESTAMP: u64 = 1_496_314_658;

/// Assembles an invoice field by field.
#[derive(Clone, Debug)]
pub struct InvoiceBuilder {
    hrp: String,
    timestamp: u64,
    payment_hash: Option<[u8; 32]>,
    description: Option<String>,
    expiry_secs: Option<u64>,
    payee: Option<[u8; 33]>,
    raw_fields: Vec<(char, Vec<Fe32>)>,
    trailing: Vec<Fe32>,
    recovery_id: u8,
}

impl InvoiceBuilder {
    /// `hrp` is the full human-readable part, e.g. `lnbc2500u`.
    pub fn new(hrp: impl Into<String>) -> Self {
        Self {
            hrp: hrp.into(),
            timestamp: DEFAULT_TIMESTAMP,
            payment_hash: None,
            description: None,
            expiry_secs: None,
            payee: None,
            raw_fields: Vec::new(),
            trailing: Vec::new(),
            recovery_id: 0,
        }
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn payment_hash(mut self, hash: [u8; 32]) -> Self {
        self.payment_hash = Some(hash);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn expiry_secs(mut self, expiry: u64) -> Self {
        self.expiry_secs = Some(expiry);
        self
    }

    pub fn payee(mut self, payee: [u8; 33]) -> Self {
        self.payee = Some(payee);
        self
    }

    /// Append an arbitrary field, bypassing any length rules.
    pub fn raw_field(mut self, tag: char, data: Vec<Fe32>) -> Self {
        self.raw_fields.push((tag, data));
        self
    }

    /// Raw values placed between the last field and the signature.
    pub fn trailing(mut self, data: Vec<Fe32>) -> Self {
        self.trailing = data;
        self
    }

    pub fn recovery_id(mut self, recovery_id: u8) -> Self {
        self.recovery_id = recovery_id;
        self
    }

    pub fn build(&self) -> Result<String> {
        let hrp = Hrp::parse(&self.hrp).with_context(|| format!("invalid hrp {}", self.hrp))?;
        ensure!(self.timestamp < 1 << 35, "timestamp does not fit in 35 bits");

        let mut data = int_to_fes(self.timestamp, 7);

        if let Some(hash) = self.payment_hash {
            push_field(&mut data, 'p', hash.iter().copied().bytes_to_fes().collect())?;
        }
        if let Some(description) = &self.description {
            push_field(
                &mut data,
                'd',
                description.bytes().bytes_to_fes().collect(),
            )?;
        }
        if let Some(expiry) = self.expiry_secs {
            push_field(&mut data, 'x', int_to_fes(expiry, min_fes_for(expiry)))?;
        }
        if let Some(payee) = self.payee {
            push_field(&mut data, 'n', payee.iter().copied().bytes_to_fes().collect())?;
        }
        for (tag, field) in &self.raw_fields {
            push_field(&mut data, *tag, field.clone())?;
        }
        data.extend(self.trailing.iter().copied());

        let mut signature = [0x11u8; 65];
        signature[64] = self.recovery_id;
        data.extend(signature.iter().copied().bytes_to_fes());

        Ok(data
            .into_iter()
            .with_checksum::<Bech32>(&hrp)
            .chars()
            .collect())
    }
}

fn push_field(data: &mut Vec<Fe32>, tag: char, field: Vec<Fe32>) -> Result<()> {
    ensure!(field.len() < 1024, "field '{}' longer than 1023", tag);
    data.push(Fe32::from_char(tag).map_err(|e| anyhow!("tag '{}': {}", tag, e))?);
    data.extend(int_to_fes(field.len() as u64, 2));
    data.extend(field);
    Ok(())
}

/// Big-endian 5-bit digits of `value`, exactly `len` of them.
pub fn int_to_fes(value: u64, len: usize) -> Vec<Fe32> {
    (0..len)
        .rev()
        .map(|i| {
            let digit = if 5 * i >= 64 { 0 } else { (value >> (5 * i)) & 31 };
            Fe32::try_from(digit as u8).expect("digit is below 32")
        })
        .collect()
}

fn min_fes_for(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(5).max(1)
}
