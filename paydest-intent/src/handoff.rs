//! Payload passed from destination entry to amount entry.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PayableKind;

/// RFC 3986 unreserved characters stay as-is.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const DESTINATION_KEY: &str = "destination";
const KIND_KEY: &str = "kind";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Malformed pair: {0}")]
    MalformedPair(String),

    #[error("Invalid percent-encoding in {0}")]
    InvalidEncoding(&'static str),

    #[error("Unknown destination kind: {0}")]
    UnknownKind(String),
}

/// The destination the amount-entry stage should pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountEntryHandoff {
    pub destination: String,
    pub kind: PayableKind,
}

impl AmountEntryHandoff {
    /// `destination=<percent-encoded>&kind=<kind>`
    pub fn to_query_string(&self) -> String {
        format!(
            "{}={}&{}={}",
            DESTINATION_KEY,
            utf8_percent_encode(&self.destination, QUERY_VALUE),
            KIND_KEY,
            self.kind.as_str()
        )
    }

    /// Inverse of [`to_query_string`](Self::to_query_string). Pair order
    /// does not matter; anything else is rejected.
    pub fn from_query_string(query: &str) -> Result<Self, HandoffError> {
        let mut destination = None;
        let mut kind = None;

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| HandoffError::MalformedPair(pair.to_string()))?;

            match key {
                DESTINATION_KEY => {
                    if destination.is_some() {
                        return Err(HandoffError::DuplicateField(key.to_string()));
                    }
                    let decoded = percent_decode_str(value)
                        .decode_utf8()
                        .map_err(|_| HandoffError::InvalidEncoding(DESTINATION_KEY))?;
                    destination = Some(decoded.into_owned());
                }
                KIND_KEY => {
                    if kind.is_some() {
                        return Err(HandoffError::DuplicateField(key.to_string()));
                    }
                    kind = Some(
                        PayableKind::from_str(value)
                            .ok_or_else(|| HandoffError::UnknownKind(value.to_string()))?,
                    );
                }
                other => return Err(HandoffError::UnknownField(other.to_string())),
            }
        }

        Ok(Self {
            destination: destination.ok_or(HandoffError::MissingField(DESTINATION_KEY))?,
            kind: kind.ok_or(HandoffError::MissingField(KIND_KEY))?,
        })
    }
}
