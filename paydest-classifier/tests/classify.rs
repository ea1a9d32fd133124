use paydest_classifier::{
    classify, parse_destination, AddressType, Classifier, ClassifierConfig, Destination,
    DestinationKind, Network, Scheme, CLASSIFICATION_ORDER,
};
use paydest_test_fixtures::{fixtures, InvoiceBuilder, NOT_A_DESTINATION};
use proptest::prelude::*;

fn address_type_name(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::P2pkh => "p2pkh",
        AddressType::P2sh => "p2sh",
        AddressType::P2wpkh => "p2wpkh",
        AddressType::P2wsh => "p2wsh",
        AddressType::P2tr => "p2tr",
        AddressType::WitnessUnknown { .. } => "witness_unknown",
    }
}

#[test]
fn node_keys_classify_as_node_public_key() {
    for key in fixtures().node_keys() {
        assert_eq!(classify(key), DestinationKind::NodePublicKey, "{}", key);
    }
}

#[test]
fn connection_strings_classify_as_node_public_key() {
    for conn in fixtures().connection_strings() {
        assert_eq!(classify(conn), DestinationKind::NodePublicKey, "{}", conn);
        match parse_destination(conn).unwrap() {
            Destination::Node(target) => assert!(target.socket_addr.is_some()),
            other => panic!("expected node, got {:?}", other),
        }
    }
}

#[test]
fn addresses_classify_with_expected_details() {
    for fixture in fixtures().addresses() {
        assert_eq!(
            classify(&fixture.text),
            DestinationKind::OnChainAddress,
            "{}",
            fixture.text
        );
        match parse_destination(&fixture.text).unwrap() {
            Destination::OnChain(address) => {
                assert_eq!(address.network.as_str(), fixture.network, "{}", fixture.text);
                assert_eq!(
                    address_type_name(address.address_type),
                    fixture.address_type,
                    "{}",
                    fixture.text
                );
            }
            other => panic!("expected address, got {:?}", other),
        }
    }
}

#[test]
fn invoices_classify_with_expected_details() {
    for fixture in fixtures().invoices() {
        assert_eq!(
            classify(&fixture.text),
            DestinationKind::Invoice,
            "{}",
            fixture.text
        );
        match parse_destination(&fixture.text).unwrap() {
            Destination::Invoice(invoice) => {
                assert_eq!(invoice.network.as_str(), fixture.network);
                assert_eq!(invoice.amount_msat, fixture.amount_msat);
                assert_eq!(invoice.timestamp, fixture.timestamp);
                assert_eq!(invoice.payment_hash, fixture.payment_hash);
                assert_eq!(invoice.description, fixture.description);
                assert_eq!(invoice.expiry_secs, fixture.expiry_secs);
                assert_eq!(invoice.payee.map(|p| p.to_hex()), fixture.payee);
                assert_eq!(
                    invoice.expires_at(),
                    fixture.timestamp + fixture.expiry_secs
                );
            }
            other => panic!("expected invoice, got {:?}", other),
        }
    }
}

#[test]
fn near_misses_and_garbage_are_unknown() {
    for text in fixtures().unknown() {
        assert_eq!(classify(text), DestinationKind::Unknown, "{:?}", text);
        assert!(parse_destination(text).is_err(), "{:?}", text);
    }
}

#[test]
fn scenario_inputs() {
    assert_eq!(classify(""), DestinationKind::Unknown);
    assert_eq!(classify(NOT_A_DESTINATION), DestinationKind::Unknown);
}

#[test]
fn payment_uris() {
    let fixtures = fixtures();
    assert_eq!(classify(&fixtures.bitcoin_uri()), DestinationKind::OnChainAddress);
    assert_eq!(classify(&fixtures.lightning_uri()), DestinationKind::Invoice);

    let upper_scheme = fixtures.lightning_uri().replacen("lightning", "LIGHTNING", 1);
    assert_eq!(classify(&upper_scheme), DestinationKind::Invoice);
}

#[test]
fn classification_order_is_fixed() {
    assert_eq!(
        CLASSIFICATION_ORDER,
        [
            Scheme::NodePublicKey,
            Scheme::ConnectionString,
            Scheme::SegwitAddress,
            Scheme::Base58Address,
            Scheme::BitcoinUri,
            Scheme::Invoice,
            Scheme::LightningUri,
        ]
    );
}

#[test]
fn matched_scheme_agrees_with_classify() {
    let classifier = Classifier::default();
    let fixtures = fixtures();
    let samples = fixtures
        .node_keys()
        .iter()
        .chain(fixtures.connection_strings())
        .chain(fixtures.addresses().iter().map(|a| &a.text))
        .chain(fixtures.invoices().iter().map(|i| &i.text))
        .chain(fixtures.unknown());

    for text in samples {
        let kind = classifier.classify(text);
        match classifier.matched_scheme(text) {
            Some(scheme) => assert_eq!(scheme.kind(), kind),
            None => assert_eq!(kind, DestinationKind::Unknown),
        }
        if let Ok(destination) = classifier.parse(text) {
            assert_eq!(destination.kind(), kind);
        }
    }
}

#[test]
fn whitespace_is_not_trimmed() {
    let fixtures = fixtures();
    let key = &fixtures.node_keys()[0];
    let address = &fixtures.addresses()[0].text;
    let invoice = &fixtures.invoices()[0].text;

    for valid in [key, address, invoice] {
        assert_ne!(classify(valid), DestinationKind::Unknown);
        for wrapped in [
            format!(" {}", valid),
            format!("{} ", valid),
            format!("\t{}\n", valid),
        ] {
            assert_eq!(classify(&wrapped), DestinationKind::Unknown, "{:?}", wrapped);
        }
    }
    assert_eq!(classify("   "), DestinationKind::Unknown);
}

#[test]
fn case_rules_follow_each_encoding() {
    let fixtures = fixtures();
    let key = &fixtures.node_keys()[1];
    assert_eq!(classify(&key.to_uppercase()), DestinationKind::NodePublicKey);

    let address = &fixtures.addresses()[0].text;
    assert_eq!(classify(&address.to_uppercase()), DestinationKind::OnChainAddress);

    let invoice = &fixtures.invoices()[0].text;
    assert_eq!(classify(&invoice.to_uppercase()), DestinationKind::Invoice);

    // Base58 is case-sensitive.
    assert_eq!(
        classify("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
        DestinationKind::OnChainAddress
    );
    assert_eq!(
        classify("1a1Zp1Ep5qgEFI2dmptFtl5slMV7dIVFnA"),
        DestinationKind::Unknown
    );
}

#[test]
fn network_restriction_covers_invoices() {
    let signet = Classifier::new(ClassifierConfig::default().with_network(Network::Signet));
    for fixture in fixtures().invoices() {
        let expected = if fixture.network == "signet" {
            DestinationKind::Invoice
        } else {
            DestinationKind::Unknown
        };
        assert_eq!(signet.classify(&fixture.text), expected, "{}", fixture.text);
    }
}

#[test]
fn invoice_with_unknown_fields_is_still_an_invoice() {
    let invoice = InvoiceBuilder::new("lnbc1m")
        .payment_hash([9; 32])
        .raw_field('9', vec![])
        .raw_field('c', paydest_test_fixtures::invoice::int_to_fes(144, 2))
        .build()
        .unwrap();
    assert_eq!(classify(&invoice), DestinationKind::Invoice);
}

#[test]
fn invoice_past_bech32_code_length_is_still_an_invoice() {
    let mut builder = InvoiceBuilder::new("lnbc2500u").payment_hash([3; 32]);
    for _ in 0..12 {
        builder = builder.raw_field('r', paydest_test_fixtures::invoice::int_to_fes(0, 82));
    }
    let invoice = builder.build().unwrap();
    assert!(invoice.len() > 1100, "{}", invoice.len());

    assert_eq!(classify(&invoice), DestinationKind::Invoice);
    match parse_destination(&invoice).unwrap() {
        Destination::Invoice(summary) => {
            assert_eq!(summary.amount_msat, Some(250_000_000));
            assert_eq!(summary.payment_hash, hex::encode([3u8; 32]));
        }
        other => panic!("expected invoice, got {:?}", other),
    }
}

#[test]
fn empty_expiry_field_keeps_default_expiry() {
    let invoice = InvoiceBuilder::new("lnbc1m")
        .payment_hash([5; 32])
        .raw_field('x', vec![])
        .build()
        .unwrap();
    match parse_destination(&invoice).unwrap() {
        Destination::Invoice(summary) => {
            assert_eq!(summary.expiry_secs, paydest_classifier::invoice::DEFAULT_EXPIRY_SECS)
        }
        other => panic!("expected invoice, got {:?}", other),
    }
}

#[test]
fn huge_input_is_unknown() {
    let huge = "q".repeat(1 << 20);
    assert_eq!(classify(&huge), DestinationKind::Unknown);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn classify_is_total_and_deterministic(s in any::<String>()) {
        let first = classify(&s);
        prop_assert!(DestinationKind::ALL.contains(&first));
        prop_assert_eq!(first, classify(&s));
    }

    #[test]
    fn bech32_shaped_input_never_panics(s in "(ln|bc|tb|bcrt)[a-z0-9]{0,8}1[qpzry9x8gf2tvdw0s3jn54khce6mua7l]{0,400}") {
        let kind = classify(&s);
        prop_assert_eq!(kind, classify(&s));
    }

    #[test]
    fn hex_shaped_input_never_panics(s in "0[0-9a-fA-F]{65}(@[a-z0-9.:]{0,20})?") {
        let kind = classify(&s);
        prop_assert!(kind == DestinationKind::NodePublicKey || kind == DestinationKind::Unknown);
    }

    #[test]
    fn parse_agrees_with_classify(s in any::<String>()) {
        let kind = classify(&s);
        match parse_destination(&s) {
            Ok(destination) => prop_assert_eq!(destination.kind(), kind),
            Err(_) => prop_assert_eq!(kind, DestinationKind::Unknown),
        }
    }
}
