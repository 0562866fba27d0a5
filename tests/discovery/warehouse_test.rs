//! Prefix-encoded warehouse schema: TPC-H style single-letter prefixes,
//! composite keys, and the nationkey/regionkey arbitration regression.

use std::collections::BTreeSet;

use weaver::{discover_from_tables, ColumnDef, DiscoveryConfig, TableDef};

fn table(name: &str, columns: Vec<ColumnDef>) -> TableDef {
    TableDef::new("OFFLINE", "TPCH", name, columns)
}

fn warehouse_schema() -> Vec<TableDef> {
    vec![
        table(
            "CUSTOMER",
            vec![
                ColumnDef::new("C_CUSTKEY", "NUMBER").primary_key(),
                ColumnDef::new("C_NAME", "STRING"),
                ColumnDef::new("C_NATIONKEY", "NUMBER"),
                ColumnDef::new("C_ACCTBAL", "NUMBER"),
            ],
        ),
        table(
            "ORDERS",
            vec![
                ColumnDef::new("O_ORDERKEY", "NUMBER").primary_key(),
                ColumnDef::new("O_CUSTKEY", "NUMBER"),
                ColumnDef::new("O_TOTALPRICE", "NUMBER"),
            ],
        ),
        table(
            "LINEITEM",
            vec![
                ColumnDef::new("L_ORDERKEY", "NUMBER").primary_key(),
                ColumnDef::new("L_PARTKEY", "NUMBER").primary_key(),
                ColumnDef::new("L_LINENUMBER", "NUMBER").primary_key(),
                ColumnDef::new("L_SUPPKEY", "NUMBER"),
                ColumnDef::new("L_QUANTITY", "NUMBER"),
            ],
        ),
        table(
            "PART",
            vec![
                ColumnDef::new("P_PARTKEY", "NUMBER").primary_key(),
                ColumnDef::new("P_NAME", "STRING"),
            ],
        ),
        table(
            "SUPPLIER",
            vec![
                ColumnDef::new("S_SUPPKEY", "NUMBER").primary_key(),
                ColumnDef::new("S_NATIONKEY", "NUMBER"),
            ],
        ),
        table(
            "NATION",
            vec![
                ColumnDef::new("N_NATIONKEY", "NUMBER").primary_key(),
                ColumnDef::new("N_REGIONKEY", "NUMBER"),
            ],
        ),
        table(
            "REGION",
            vec![
                ColumnDef::new("R_REGIONKEY", "NUMBER").primary_key(),
                ColumnDef::new("R_NAME", "STRING"),
            ],
        ),
    ]
}

fn canonical_joins() -> BTreeSet<(String, String, String, String)> {
    [
        ("ORDERS", "O_CUSTKEY", "CUSTOMER", "C_CUSTKEY"),
        ("CUSTOMER", "C_NATIONKEY", "NATION", "N_NATIONKEY"),
        ("LINEITEM", "L_ORDERKEY", "ORDERS", "O_ORDERKEY"),
        ("LINEITEM", "L_PARTKEY", "PART", "P_PARTKEY"),
        ("LINEITEM", "L_SUPPKEY", "SUPPLIER", "S_SUPPKEY"),
        ("SUPPLIER", "S_NATIONKEY", "NATION", "N_NATIONKEY"),
        ("NATION", "N_REGIONKEY", "REGION", "R_REGIONKEY"),
    ]
    .into_iter()
    .map(|(a, b, c, d)| (a.to_string(), b.to_string(), c.to_string(), d.to_string()))
    .collect()
}

fn discovered_joins(tables: Vec<TableDef>) -> BTreeSet<(String, String, String, String)> {
    let outcome = discover_from_tables(tables, &DiscoveryConfig::default()).unwrap();
    outcome
        .relationships
        .iter()
        .flat_map(|r| {
            r.column_pairs.iter().map(|p| {
                (
                    r.left_table.clone(),
                    p.left_column.clone(),
                    r.right_table.clone(),
                    p.right_column.clone(),
                )
            })
        })
        .collect()
}

#[test]
fn test_exactly_the_seven_canonical_joins() {
    assert_eq!(discovered_joins(warehouse_schema()), canonical_joins());
}

#[test]
fn test_nationkey_beats_regionkey_for_customer() {
    let outcome = discover_from_tables(warehouse_schema(), &DiscoveryConfig::default()).unwrap();
    let nation_rel = outcome
        .relationships
        .iter()
        .find(|r| r.left_table == "CUSTOMER")
        .expect("customer must link somewhere");
    assert_eq!(nation_rel.right_table, "NATION");
    assert_eq!(nation_rel.column_pairs[0].right_column, "N_NATIONKEY");
}

#[test]
fn test_winner_is_independent_of_target_column_order() {
    // Same schema with NATION's columns swapped: the regionkey column now
    // enumerates before the nationkey primary key.
    let mut tables = warehouse_schema();
    let nation = tables
        .iter_mut()
        .find(|t| t.name == "NATION")
        .expect("nation table");
    nation.columns.reverse();

    assert_eq!(discovered_joins(tables), canonical_joins());
}

#[test]
fn test_linenumber_never_becomes_a_foreign_key() {
    let outcome = discover_from_tables(warehouse_schema(), &DiscoveryConfig::default()).unwrap();
    for rel in &outcome.relationships {
        for pair in &rel.column_pairs {
            assert_ne!(pair.left_column, "L_LINENUMBER");
        }
    }
}

#[test]
fn test_confidences_are_high_for_prefixed_convention() {
    let outcome = discover_from_tables(warehouse_schema(), &DiscoveryConfig::default()).unwrap();
    assert_eq!(outcome.relationships.len(), 7);
    for rel in &outcome.relationships {
        assert!(
            rel.confidence >= 0.7,
            "{} scored only {}",
            rel.name,
            rel.confidence
        );
    }
}
