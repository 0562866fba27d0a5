//! Determinism and input-order invariance: the emitted relationship list
//! is a total function of the input set, not of its ordering.

use weaver::{
    discover_from_tables, ColumnDef, DiscoveryConfig, DiscoveryOutcome, Relationship, TableDef,
};

fn schema() -> Vec<TableDef> {
    vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "CUSTOMERS",
            vec![
                ColumnDef::new("customer_id", "NUMBER").primary_key(),
                ColumnDef::new("region_id", "NUMBER"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "REGIONS",
            vec![ColumnDef::new("region_id", "NUMBER").primary_key()],
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
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "PRODUCTS",
            vec![ColumnDef::new("product_id", "NUMBER").primary_key()],
        ),
    ]
}

fn run(tables: Vec<TableDef>) -> DiscoveryOutcome {
    discover_from_tables(tables, &DiscoveryConfig::default()).unwrap()
}

fn relationships_json(outcome: &DiscoveryOutcome) -> String {
    serde_json::to_string(&outcome.relationships).unwrap()
}

#[test]
fn test_identical_runs_are_byte_identical() {
    let first = run(schema());
    let second = run(schema());
    assert_eq!(relationships_json(&first), relationships_json(&second));
    assert_eq!(first.tables, second.tables);
}

#[test]
fn test_table_order_does_not_change_output() {
    let baseline = relationships_json(&run(schema()));

    let mut reversed = schema();
    reversed.reverse();
    assert_eq!(relationships_json(&run(reversed)), baseline);

    let mut rotated = schema();
    rotated.rotate_left(2);
    assert_eq!(relationships_json(&run(rotated)), baseline);
}

#[test]
fn test_column_order_on_pk_side_does_not_change_winners() {
    let baseline: Vec<(String, String)> = run(schema())
        .relationships
        .iter()
        .map(|r| (r.left_table.clone(), r.right_table.clone()))
        .collect();

    let mut shuffled = schema();
    for table in &mut shuffled {
        table.columns.reverse();
    }
    let shuffled_pairs: Vec<(String, String)> = run(shuffled)
        .relationships
        .iter()
        .map(|r| (r.left_table.clone(), r.right_table.clone()))
        .collect();

    let mut baseline_sorted = baseline;
    let mut shuffled_sorted = shuffled_pairs;
    baseline_sorted.sort();
    shuffled_sorted.sort();
    assert_eq!(baseline_sorted, shuffled_sorted);
}

#[test]
fn test_output_order_is_documented_total_order() {
    let outcome = run(schema());
    let relationships: &[Relationship] = &outcome.relationships;
    for window in relationships.windows(2) {
        let a = &window[0];
        let b = &window[1];
        let ordered = a.confidence > b.confidence
            || (a.confidence == b.confidence
                && (a.left_table.clone(), a.right_table.clone())
                    <= (b.left_table.clone(), b.right_table.clone()));
        assert!(ordered, "out of order: {} before {}", a.name, b.name);
    }
}

#[test]
fn test_summary_is_stable_modulo_timing() {
    let mut first = run(schema()).summary;
    let mut second = run(schema()).summary;
    first.processing_time_ms = 0;
    second.processing_time_ms = 0;
    assert_eq!(first, second);
}
