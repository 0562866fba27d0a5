//! Star-schema discovery: a fact table against conformed dimensions,
//! including a role-playing date key that only matches by entity containment.

use weaver::{discover_from_tables, ColumnDef, DiscoveryConfig, JoinType, Provenance, TableDef};

fn star_schema() -> Vec<TableDef> {
    vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "DIM_CUSTOMER",
            vec![
                ColumnDef::new("customer_key", "NUMBER").primary_key(),
                ColumnDef::new("customer_name", "STRING"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "DIM_PRODUCT",
            vec![
                ColumnDef::new("product_key", "NUMBER").primary_key(),
                ColumnDef::new("product_name", "STRING"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "DIM_DATE",
            vec![
                ColumnDef::new("date_key", "NUMBER").primary_key(),
                ColumnDef::new("calendar_date", "DATE"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "FACT_ORDERS",
            vec![
                ColumnDef::new("order_id", "NUMBER").primary_key(),
                ColumnDef::new("order_date_key", "NUMBER"),
                ColumnDef::new("customer_key", "NUMBER"),
                ColumnDef::new("product_key", "NUMBER"),
                ColumnDef::new("order_amount", "NUMBER"),
            ],
        ),
    ]
}

fn accepted_pairs(tables: Vec<TableDef>) -> Vec<(String, String)> {
    let outcome = discover_from_tables(tables, &DiscoveryConfig::default()).unwrap();
    outcome
        .relationships
        .iter()
        .map(|r| (r.left_table.clone(), r.right_table.clone()))
        .collect()
}

#[test]
fn test_fact_links_to_every_dimension() {
    let pairs = accepted_pairs(star_schema());
    for dimension in ["DIM_CUSTOMER", "DIM_PRODUCT", "DIM_DATE"] {
        assert!(
            pairs.contains(&("FACT_ORDERS".to_string(), dimension.to_string())),
            "missing FACT_ORDERS -> {dimension}, got {pairs:?}"
        );
    }
}

#[test]
fn test_no_relationships_beyond_the_star() {
    let pairs = accepted_pairs(star_schema());
    assert_eq!(pairs.len(), 3, "expected exactly the star joins, got {pairs:?}");
}

#[test]
fn test_role_playing_date_key_resolves_by_entity() {
    let outcome = discover_from_tables(star_schema(), &DiscoveryConfig::default()).unwrap();
    let date_rel = outcome
        .relationships
        .iter()
        .find(|r| r.right_table == "DIM_DATE")
        .expect("order_date_key must resolve to the date dimension");
    assert_eq!(date_rel.column_pairs.len(), 1);
    assert_eq!(date_rel.column_pairs[0].left_column, "order_date_key");
    assert_eq!(date_rel.column_pairs[0].right_column, "date_key");
}

#[test]
fn test_direct_relationships_use_inner_joins() {
    let outcome = discover_from_tables(star_schema(), &DiscoveryConfig::default()).unwrap();
    for rel in &outcome.relationships {
        assert_eq!(rel.provenance, Provenance::Direct);
        assert_eq!(rel.join_type, JoinType::Inner);
    }
}

#[test]
fn test_summary_counts() {
    let outcome = discover_from_tables(star_schema(), &DiscoveryConfig::default()).unwrap();
    assert_eq!(outcome.summary.total_tables, 4);
    assert_eq!(outcome.summary.total_columns, 11);
    assert_eq!(outcome.summary.total_relationships, 3);
    assert!(!outcome.summary.limited_by_timeout);
    assert!(!outcome.summary.limited_by_table_cap);
}
