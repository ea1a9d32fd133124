use paydest_classifier::{classify, ClassifierConfig, DestinationKind, Network};
use paydest_intent::{
    decide, AmountEntryHandoff, PayableKind, RejectionReason, SendIntent, SendIntentController,
};
use paydest_test_fixtures::{
    fixtures, invoice::int_to_fes, InvoiceBuilder, GENERATOR_NODE_KEY, NOT_A_DESTINATION,
};
use proptest::prelude::*;

#[test]
fn scenario_a_empty_input() {
    assert_eq!(
        decide(""),
        SendIntent::Reject {
            reason: RejectionReason::EmptyInput
        }
    );
}

#[test]
fn scenario_b_unparseable() {
    assert_eq!(
        decide(NOT_A_DESTINATION),
        SendIntent::Reject {
            reason: RejectionReason::UnparseableDestination
        }
    );
}

#[test]
fn scenario_c_node_public_key() {
    assert_eq!(
        decide(GENERATOR_NODE_KEY),
        SendIntent::Proceed {
            destination: GENERATOR_NODE_KEY.to_string(),
            kind: PayableKind::NodePublicKey,
        }
    );
}

#[test]
fn scenario_d_invoice() {
    for fixture in fixtures().invoices() {
        assert_eq!(
            decide(&fixture.text),
            SendIntent::Reject {
                reason: RejectionReason::UnsupportedInvoice
            },
            "{}",
            fixture.text
        );
    }
    assert_eq!(
        decide(&fixtures().lightning_uri()).rejection(),
        Some(RejectionReason::UnsupportedInvoice)
    );
}

#[test]
fn invoice_with_many_route_hints_is_unsupported() {
    let mut builder = InvoiceBuilder::new("lnbc2500u").payment_hash([3; 32]);
    for _ in 0..20 {
        builder = builder.raw_field('r', int_to_fes(0, 82));
    }
    let invoice = builder.build().unwrap();
    assert!(invoice.len() > 1100);
    assert_eq!(
        decide(&invoice),
        SendIntent::Reject {
            reason: RejectionReason::UnsupportedInvoice
        }
    );
}

#[test]
fn every_fixture_follows_the_table() {
    let fixtures = fixtures();
    for key in fixtures.node_keys().iter().chain(fixtures.connection_strings()) {
        assert_eq!(
            decide(key),
            SendIntent::Proceed {
                destination: key.clone(),
                kind: PayableKind::NodePublicKey,
            }
        );
    }
    for address in fixtures.addresses() {
        assert_eq!(
            decide(&address.text),
            SendIntent::Proceed {
                destination: address.text.clone(),
                kind: PayableKind::OnChainAddress,
            }
        );
    }
    for text in fixtures.unknown() {
        let expected = if text.is_empty() {
            RejectionReason::EmptyInput
        } else {
            RejectionReason::UnparseableDestination
        };
        assert_eq!(decide(text).rejection(), Some(expected), "{:?}", text);
    }
}

#[test]
fn uri_destination_is_passed_through_verbatim() {
    let uri = fixtures().bitcoin_uri();
    match decide(&uri) {
        SendIntent::Proceed { destination, kind } => {
            assert_eq!(destination, uri);
            assert_eq!(kind, PayableKind::OnChainAddress);
        }
        other => panic!("expected proceed, got {:?}", other),
    }
}

#[test]
fn disabled_schemes_reject() {
    let controller = SendIntentController::with_config(
        ClassifierConfig::default()
            .with_uri_schemes(false)
            .with_connection_strings(false),
    );
    let fixtures = fixtures();
    assert_eq!(
        controller.decide(&fixtures.bitcoin_uri()).rejection(),
        Some(RejectionReason::UnparseableDestination)
    );
    assert_eq!(
        controller.decide(&fixtures.connection_strings()[0]).rejection(),
        Some(RejectionReason::UnparseableDestination)
    );
    // The bare forms are unaffected.
    assert!(controller.decide(GENERATOR_NODE_KEY).is_proceed());
}

#[test]
fn wrong_network_invoice_is_unparseable() {
    let controller =
        SendIntentController::with_config(ClassifierConfig::default().with_network(Network::Regtest));
    for fixture in fixtures().invoices() {
        let expected = if fixture.network == "regtest" {
            RejectionReason::UnsupportedInvoice
        } else {
            RejectionReason::UnparseableDestination
        };
        assert_eq!(controller.decide(&fixture.text).rejection(), Some(expected));
    }
}

#[test]
fn handoff_carries_the_entered_text() {
    let conn = &fixtures().connection_strings()[0];
    let handoff = decide(conn).handoff().unwrap();
    assert_eq!(handoff.destination, *conn);
    assert_eq!(
        AmountEntryHandoff::from_query_string(&handoff.to_query_string()).unwrap(),
        handoff
    );
    assert!(decide("").handoff().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn decide_follows_classify(s in any::<String>()) {
        let intent = decide(&s);
        if s.is_empty() {
            prop_assert_eq!(intent.rejection(), Some(RejectionReason::EmptyInput));
            return Ok(());
        }
        match classify(&s) {
            DestinationKind::Invoice => {
                prop_assert_eq!(intent.rejection(), Some(RejectionReason::UnsupportedInvoice))
            }
            DestinationKind::Unknown => {
                prop_assert_eq!(intent.rejection(), Some(RejectionReason::UnparseableDestination))
            }
            kind => match intent {
                SendIntent::Proceed { destination, kind: payable } => {
                    prop_assert_eq!(destination, s);
                    prop_assert_eq!(DestinationKind::from(payable), kind);
                }
                other => prop_assert!(false, "expected proceed, got {:?}", other),
            },
        }
    }

    #[test]
    fn decide_is_deterministic(s in any::<String>()) {
        prop_assert_eq!(decide(&s), decide(&s));
    }

    #[test]
    fn handoff_round_trips(destination in any::<String>(), node in any::<bool>()) {
        let kind = if node { PayableKind::NodePublicKey } else { PayableKind::OnChainAddress };
        let handoff = AmountEntryHandoff { destination, kind };
        let decoded = AmountEntryHandoff::from_query_string(&handoff.to_query_string()).unwrap();
        prop_assert_eq!(decoded, handoff);
    }
}
