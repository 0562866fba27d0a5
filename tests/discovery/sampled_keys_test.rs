//! Key inference from sample values: no declared keys anywhere, uniqueness
//! and containment carry the discovery.

use weaver::{discover_from_tables, Cardinality, ColumnDef, DiscoveryConfig, TableDef};

fn sampled_schema() -> Vec<TableDef> {
    // 25 unique user ids.
    let user_ids: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
    // 30 order rows: unique order ids, repeated user ids drawn from USR.
    let order_ids: Vec<String> = (1001..=1030).map(|i| i.to_string()).collect();
    let order_user_ids: Vec<String> = (0..30).map(|i| ((i % 10) + 1).to_string()).collect();
    // 20 payment rows: unique payment ids, repeated order ids drawn from ORD.
    let payment_ids: Vec<String> = (5001..=5020).map(|i| i.to_string()).collect();
    let payment_order_ids: Vec<String> = (0..20).map(|i| (1001 + (i % 8)).to_string()).collect();

    vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "USR",
            vec![
                ColumnDef::new("uid", "NUMBER").with_samples(user_ids),
                ColumnDef::new("handle", "STRING"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "ORD",
            vec![
                ColumnDef::new("oid", "NUMBER").with_samples(order_ids),
                ColumnDef::new("uid", "NUMBER").with_samples(order_user_ids),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "PAY",
            vec![
                ColumnDef::new("pid", "NUMBER").with_samples(payment_ids),
                ColumnDef::new("oid", "NUMBER").with_samples(payment_order_ids),
            ],
        ),
    ]
}

#[test]
fn test_sample_inferred_keys_drive_discovery() {
    let outcome = discover_from_tables(sampled_schema(), &DiscoveryConfig::default()).unwrap();
    let pairs: Vec<(&str, &str)> = outcome
        .relationships
        .iter()
        .map(|r| (r.left_table.as_str(), r.right_table.as_str()))
        .collect();

    assert!(pairs.contains(&("ORD", "USR")), "got {pairs:?}");
    assert!(pairs.contains(&("PAY", "ORD")), "got {pairs:?}");
    assert_eq!(pairs.len(), 2);
}

#[test]
fn test_repeated_fk_samples_classify_many_to_one() {
    let outcome = discover_from_tables(sampled_schema(), &DiscoveryConfig::default()).unwrap();
    for rel in &outcome.relationships {
        assert_eq!(rel.cardinality, Cardinality::ManyToOne, "{}", rel.name);
    }
}

#[test]
fn test_containment_lifts_confidence_above_name_only() {
    let outcome = discover_from_tables(sampled_schema(), &DiscoveryConfig::default()).unwrap();
    let ord_usr = outcome
        .relationships
        .iter()
        .find(|r| r.left_table == "ORD")
        .unwrap();
    // Exact name plus full containment plus clean statistics.
    assert!(
        ord_usr.confidence >= 0.65,
        "expected strong confidence, got {}",
        ord_usr.confidence
    );
}

#[test]
fn test_disjoint_samples_block_cross_links() {
    let outcome = discover_from_tables(sampled_schema(), &DiscoveryConfig::default()).unwrap();
    for rel in &outcome.relationships {
        assert_ne!(
            (rel.left_table.as_str(), rel.right_table.as_str()),
            ("PAY", "USR"),
            "payment order ids do not live in USR"
        );
    }
}

#[test]
fn test_nulls_in_fk_samples_yield_left_join() {
    let mut schema = sampled_schema();
    // Replace ORD.uid samples with a null-bearing set.
    let ord = schema.iter_mut().find(|t| t.name == "ORD").unwrap();
    let mut samples: Vec<Option<String>> =
        (0..29).map(|i| Some(((i % 10) + 1).to_string())).collect();
    samples.push(None);
    ord.columns[1] = ColumnDef::new("uid", "NUMBER").with_nullable_samples(samples);

    let outcome = discover_from_tables(schema, &DiscoveryConfig::default()).unwrap();
    let ord_usr = outcome
        .relationships
        .iter()
        .find(|r| r.left_table == "ORD")
        .expect("ORD -> USR with observed nulls");
    assert_eq!(ord_usr.join_type, weaver::JoinType::Left);
}
