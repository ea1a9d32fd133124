//! Shared destination vectors for the paydest test suites.
//!
//! Well-known vectors (BIP 173/350 addresses, the genesis address, the
//! secp256k1 generator) sit next to generated ones. Generated vectors are
//! built with the encoders from `bech32`, `bs58` and `k256`, so their
//! checksums and curve points are correct by construction.

use anyhow::{Context, Result};
use bech32::{hrp, primitives::iter::ByteIterExt, segwit, Fe32, Hrp};
use k256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};
use once_cell::sync::OnceCell;
use serde::Serialize;

pub mod invoice;

pub use invoice::InvoiceBuilder;

/// The compressed secp256k1 generator point.
pub const GENERATOR_NODE_KEY: &str =
    "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Text that must never classify as anything.
pub const NOT_A_DESTINATION: &str = "not-a-real-thing-12345";

static FIXTURES: OnceCell<DestinationFixtures> = OnceCell::new();

/// An on-chain address and what it should decode to.
#[derive(Clone, Debug, Serialize)]
pub struct AddressFixture {
    pub text: String,
    /// `bitcoin`, `testnet` or `regtest`
    pub network: &'static str,
    /// `p2pkh`, `p2sh`, `p2wpkh`, `p2wsh`, `p2tr` or `witness_unknown`
    pub address_type: &'static str,
}

/// An invoice and the fields it was built from.
#[derive(Clone, Debug, Serialize)]
pub struct InvoiceFixture {
    pub text: String,
    /// `bitcoin`, `testnet`, `signet` or `regtest`
    pub network: &'static str,
    pub amount_msat: Option<u64>,
    pub timestamp: u64,
    pub payment_hash: String,
    pub description: Option<String>,
    pub expiry_secs: u64,
    pub payee: Option<String>,
}

/// Every vector set, built once per test binary.
#[derive(Debug, Serialize)]
pub struct DestinationFixtures {
    node_keys: Vec<String>,
    connection_strings: Vec<String>,
    addresses: Vec<AddressFixture>,
    invoices: Vec<InvoiceFixture>,
    unknown: Vec<String>,
}

impl DestinationFixtures {
    /// Bare hex compressed public keys.
    pub fn node_keys(&self) -> &[String] {
        &self.node_keys
    }

    /// `pubkey@host[:port]` strings.
    pub fn connection_strings(&self) -> &[String] {
        &self.connection_strings
    }

    pub fn addresses(&self) -> &[AddressFixture] {
        &self.addresses
    }

    pub fn invoices(&self) -> &[InvoiceFixture] {
        &self.invoices
    }

    /// Near misses and garbage that must classify as unknown.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    /// A `bitcoin:` URI wrapping the first address.
    pub fn bitcoin_uri(&self) -> String {
        format!("bitcoin:{}?amount=0.001&label=fixture", self.addresses[0].text)
    }

    /// A `lightning:` URI wrapping the first invoice.
    pub fn lightning_uri(&self) -> String {
        format!("lightning:{}", self.invoices[0].text)
    }
}

/// Lazily build and return the shared fixtures.
pub fn fixtures() -> &'static DestinationFixtures {
    FIXTURES.get_or_init(|| build_fixtures().expect("failed to build paydest test fixtures"))
}

fn build_fixtures() -> Result<DestinationFixtures> {
    let node_keys = build_node_keys()?;
    let connection_strings = vec![
        format!("{}@127.0.0.1:9735", node_keys[0]),
        format!("{}@node.example.com", node_keys[1]),
        format!("{}@[2001:db8::1]:9735", node_keys[2]),
    ];
    let addresses = build_addresses()?;
    let invoices = build_invoices(&node_keys)?;
    let unknown = build_unknown(&node_keys, &addresses, &invoices)?;

    Ok(DestinationFixtures {
        node_keys,
        connection_strings,
        addresses,
        invoices,
        unknown,
    })
}

/// Public key for the secret scalar `[seed; 32]`.
pub fn node_key_from_seed(seed: u8) -> Result<[u8; 33]> {
    let secret = SecretKey::from_slice(&[seed; 32]).context("secret key from seed")?;
    let point = secret.public_key().to_encoded_point(true);
    point
        .as_bytes()
        .try_into()
        .context("compressed point is 33 bytes")
}

fn build_node_keys() -> Result<Vec<String>> {
    let mut keys = vec![GENERATOR_NODE_KEY.to_string()];
    for seed in 1..=8u8 {
        keys.push(hex::encode(node_key_from_seed(seed)?));
    }
    // Uppercase hex is accepted too.
    keys.push(hex::encode_upper(node_key_from_seed(9)?));
    Ok(keys)
}

fn build_addresses() -> Result<Vec<AddressFixture>> {
    let mut addresses = vec![
        AddressFixture {
            text: "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4".into(),
            network: "bitcoin",
            address_type: "p2wpkh",
        },
        AddressFixture {
            text: "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4".into(),
            network: "bitcoin",
            address_type: "p2wpkh",
        },
        AddressFixture {
            text: "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7".into(),
            network: "testnet",
            address_type: "p2wsh",
        },
        AddressFixture {
            text: "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0".into(),
            network: "bitcoin",
            address_type: "p2tr",
        },
        AddressFixture {
            text: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".into(),
            network: "bitcoin",
            address_type: "p2pkh",
        },
        AddressFixture {
            text: "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy".into(),
            network: "bitcoin",
            address_type: "p2sh",
        },
    ];

    let segwit_cases: [(Hrp, &'static str, Fe32, usize, &'static str); 6] = [
        (hrp::BC, "bitcoin", segwit::VERSION_0, 32, "p2wsh"),
        (hrp::TB, "testnet", segwit::VERSION_0, 20, "p2wpkh"),
        (hrp::TB, "testnet", segwit::VERSION_1, 32, "p2tr"),
        (hrp::BCRT, "regtest", segwit::VERSION_0, 20, "p2wpkh"),
        (hrp::BCRT, "regtest", segwit::VERSION_1, 32, "p2tr"),
        (hrp::BC, "bitcoin", Fe32::Z, 16, "witness_unknown"),
    ];
    for (i, (hrp, network, version, len, address_type)) in segwit_cases.into_iter().enumerate() {
        let program = vec![0x40 + i as u8; len];
        let text = segwit::encode(hrp, version, &program).context("segwit encode")?;
        addresses.push(AddressFixture {
            text,
            network,
            address_type,
        });
    }

    let base58_cases = [
        (0x00u8, "bitcoin", "p2pkh"),
        (0x05, "bitcoin", "p2sh"),
        (0x6f, "testnet", "p2pkh"),
        (0xc4, "testnet", "p2sh"),
    ];
    for (version, network, address_type) in base58_cases {
        let mut payload = vec![version];
        payload.extend_from_slice(&[0x5a; 20]);
        addresses.push(AddressFixture {
            text: bs58::encode(payload).with_check().into_string(),
            network,
            address_type,
        });
    }

    Ok(addresses)
}

fn build_invoices(node_keys: &[String]) -> Result<Vec<InvoiceFixture>> {
    let payee = node_key_from_seed(1)?;
    debug_assert_eq!(hex::encode(payee), node_keys[1]);

    struct Case {
        hrp: &'static str,
        network: &'static str,
        amount_msat: Option<u64>,
        description: Option<&'static str>,
        expiry_secs: Option<u64>,
        payee: bool,
    }

    let cases = [
        Case {
            hrp: "lnbc",
            network: "bitcoin",
            amount_msat: None,
            description: Some("Please consider supporting this project"),
            expiry_secs: None,
            payee: false,
        },
        Case {
            hrp: "lnbc2500u",
            network: "bitcoin",
            amount_msat: Some(250_000_000),
            description: Some("1 cup coffee"),
            expiry_secs: Some(60),
            payee: false,
        },
        Case {
            hrp: "lntb20m",
            network: "testnet",
            amount_msat: Some(2_000_000_000),
            description: None,
            expiry_secs: None,
            payee: true,
        },
        Case {
            hrp: "lntbs10p",
            network: "signet",
            amount_msat: Some(1),
            description: Some("signet"),
            expiry_secs: Some(86_400),
            payee: false,
        },
        Case {
            hrp: "lnbcrt1",
            network: "regtest",
            amount_msat: Some(100_000_000_000),
            description: Some("ナンセンス 1杯"),
            expiry_secs: None,
            payee: true,
        },
    ];

    let mut invoices = Vec::new();
    for (i, case) in cases.into_iter().enumerate() {
        let payment_hash = [i as u8 + 1; 32];
        let mut builder = InvoiceBuilder::new(case.hrp).payment_hash(payment_hash);
        if let Some(description) = case.description {
            builder = builder.description(description);
        }
        if let Some(expiry) = case.expiry_secs {
            builder = builder.expiry_secs(expiry);
        }
        if case.payee {
            builder = builder.payee(payee);
        }
        invoices.push(InvoiceFixture {
            text: builder.build()?,
            network: case.network,
            amount_msat: case.amount_msat,
            timestamp: invoice::DEFAULT_TIMESTAMP,
            payment_hash: hex::encode(payment_hash),
            description: case.description.map(str::to_string),
            expiry_secs: case.expiry_secs.unwrap_or(3600),
            payee: case.payee.then(|| hex::encode(payee)),
        });
    }

    // Upper case is as valid as lower case.
    let mut upper = invoices[1].clone();
    upper.text = upper.text.to_uppercase();
    invoices.push(upper);

    Ok(invoices)
}

fn build_unknown(
    node_keys: &[String],
    addresses: &[AddressFixture],
    invoices: &[InvoiceFixture],
) -> Result<Vec<String>> {
    let node_key = &node_keys[0];
    let address = &addresses[0].text;
    let invoice = &invoices[1].text;

    let mut unknown = vec![
        NOT_A_DESTINATION.to_string(),
        " ".to_string(),
        "\t\n".to_string(),
        "hello world".to_string(),
        "bitcoin:".to_string(),
        "lightning:".to_string(),
        "lnbc1".to_string(),
        "bc1".to_string(),
        "🦀🦀🦀".to_string(),
        "\0".to_string(),
        // Surrounding whitespace is not trimmed.
        format!(" {}", address),
        format!("{}\n", node_key),
        format!(" {} ", invoice),
        // Mixed-case Bech32.
        mixed_case(address),
        // Truncations.
        node_key[..64].to_string(),
        address[..address.len() - 1].to_string(),
        invoice[..invoice.len() - 1].to_string(),
        // Single-character corruptions.
        flip_last_bech32_char(address),
        flip_last_bech32_char(invoice),
        format!("{}{}", &node_key[..2], "ff".repeat(32)),
        format!("04{}", &node_key[2..]),
        "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb".to_string(),
        // Node key with a broken socket address.
        format!("{}@", node_key),
        format!("{}@host:99999", node_key),
    ];

    // Structurally broken invoices with valid checksums.
    unknown.push(InvoiceBuilder::new("lnbc2500u").description("no hash").build()?);
    unknown.push(
        InvoiceBuilder::new("lnbc2500u")
            .payment_hash([7; 32])
            .recovery_id(4)
            .build()?,
    );
    unknown.push(
        InvoiceBuilder::new("lnbc025u")
            .payment_hash([7; 32])
            .build()?,
    );
    unknown.push(
        InvoiceBuilder::new("lnbc11p")
            .payment_hash([7; 32])
            .build()?,
    );
    unknown.push(
        InvoiceBuilder::new("lnltc2500u")
            .payment_hash([7; 32])
            .build()?,
    );
    unknown.push(
        InvoiceBuilder::new("lnbc2500u")
            .payment_hash([7; 32])
            .raw_field('d', [0xffu8, 0xfe].iter().copied().bytes_to_fes().collect())
            .build()?,
    );
    unknown.push(
        InvoiceBuilder::new("lnbc2500u")
            .payment_hash([7; 32])
            .trailing(vec![Fe32::Q, Fe32::Q])
            .build()?,
    );

    Ok(unknown)
}

fn mixed_case(s: &str) -> String {
    s.char_indices()
        .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

fn flip_last_bech32_char(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if let Some(last) = chars.last_mut() {
        *last = if *last == 'q' { 'p' } else { 'q' };
    }
    chars.into_iter().collect()
}
