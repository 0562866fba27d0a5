//! Resource limits and failure policy: timeout, relationship cap, table
//! cap, malformed-table rejection and configuration errors.

use weaver::{
    discover_from_tables, ColumnDef, DiscoveryConfig, DiscoveryError, EvidenceWeights, TableDef,
};

fn linked_tables() -> Vec<TableDef> {
    vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "CUSTOMERS",
            vec![ColumnDef::new("customer_id", "NUMBER").primary_key()],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "PRODUCTS",
            vec![ColumnDef::new("product_id", "NUMBER").primary_key()],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "ORDERS",
            vec![
                ColumnDef::new("order_id", "NUMBER").primary_key(),
                ColumnDef::new("customer_id", "NUMBER"),
                ColumnDef::new("product_id", "NUMBER"),
            ],
        ),
    ]
}

#[test]
fn test_expired_timeout_returns_partial_well_formed_result() {
    let config = DiscoveryConfig::default().with_timeout_seconds(Some(0.0));
    let outcome = discover_from_tables(linked_tables(), &config).unwrap();

    assert!(outcome.summary.limited_by_timeout);
    assert!(outcome.relationships.is_empty());
    // Accounting still happens.
    assert_eq!(outcome.summary.total_tables, 3);
    assert_eq!(outcome.summary.total_columns, 5);
}

#[test]
fn test_no_timeout_flag_under_generous_deadline() {
    let config = DiscoveryConfig::default().with_timeout_seconds(Some(300.0));
    let outcome = discover_from_tables(linked_tables(), &config).unwrap();
    assert!(!outcome.summary.limited_by_timeout);
    assert_eq!(outcome.relationships.len(), 2);
}

#[test]
fn test_max_relationships_keeps_top_scoring() {
    let config = DiscoveryConfig::default().with_max_relationships(1);
    let outcome = discover_from_tables(linked_tables(), &config).unwrap();

    assert!(outcome.summary.limited_by_max_relationships);
    assert_eq!(outcome.relationships.len(), 1);
    assert_eq!(outcome.summary.total_relationships, 1);
}

#[test]
fn test_max_tables_truncates_before_analysis() {
    let config = DiscoveryConfig::default().with_max_tables(2);
    let outcome = discover_from_tables(linked_tables(), &config).unwrap();

    assert!(outcome.summary.limited_by_table_cap);
    assert_eq!(outcome.summary.total_tables, 2);
    let notes = outcome.summary.notes.expect("cap note");
    assert!(notes.contains("limited to first 2"), "notes: {notes}");
}

#[test]
fn test_malformed_table_is_skipped_with_note() {
    let mut tables = linked_tables();
    tables.push(TableDef::new(
        "OFFLINE",
        "PUBLIC",
        "BROKEN",
        vec![
            ColumnDef::new("x", "NUMBER"),
            ColumnDef::new("X", "NUMBER"),
        ],
    ));

    let outcome = discover_from_tables(tables, &DiscoveryConfig::default()).unwrap();
    assert_eq!(outcome.summary.total_tables, 3, "BROKEN must be skipped");
    assert!(outcome
        .summary
        .notes
        .as_deref()
        .unwrap()
        .contains("BROKEN"));
    // The rest of the run is unaffected.
    assert_eq!(outcome.relationships.len(), 2);
}

#[test]
fn test_empty_column_table_is_skipped() {
    let mut tables = linked_tables();
    tables.push(TableDef::new("OFFLINE", "PUBLIC", "HOLLOW", vec![]));
    let outcome = discover_from_tables(tables, &DiscoveryConfig::default()).unwrap();
    assert_eq!(outcome.summary.total_tables, 3);
    assert!(outcome.summary.notes.is_some());
}

#[test]
fn test_invalid_min_confidence_refuses_to_start() {
    let config = DiscoveryConfig::default().with_min_confidence(1.5);
    let result = discover_from_tables(linked_tables(), &config);
    assert!(matches!(result, Err(DiscoveryError::InvalidConfig(_))));
}

#[test]
fn test_zero_weights_refuse_to_start() {
    let config = DiscoveryConfig::default().with_weights(EvidenceWeights {
        name_similarity: 0.0,
        type_compatibility: 0.0,
        value_containment: 0.0,
        schema_pattern: 0.0,
        domain_prior: 0.0,
        statistical: 0.0,
        cardinality: 0.0,
    });
    let result = discover_from_tables(linked_tables(), &config);
    assert!(matches!(result, Err(DiscoveryError::InvalidConfig(_))));
}

#[test]
fn test_min_confidence_filters_weak_relationships() {
    let config = DiscoveryConfig::default().with_min_confidence(0.95);
    let outcome = discover_from_tables(linked_tables(), &config).unwrap();
    assert!(outcome.relationships.is_empty());
    assert_eq!(outcome.summary.total_relationships, 0);
}
