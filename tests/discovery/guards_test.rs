//! False-positive guards: generic id columns, self references, and
//! suffix-only matches must never produce relationships.

use weaver::{discover_from_tables, ColumnDef, DiscoveryConfig, TableDef};

fn run(tables: Vec<TableDef>) -> Vec<String> {
    discover_from_tables(tables, &DiscoveryConfig::default())
        .unwrap()
        .relationships
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[test]
fn test_generic_id_trap_yields_nothing() {
    // Two tables with a bare `id` and a `value`; no semantic prefixes.
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "METRICS",
            vec![
                ColumnDef::new("id", "NUMBER").primary_key(),
                ColumnDef::new("value", "NUMBER"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "READINGS",
            vec![
                ColumnDef::new("id", "NUMBER").primary_key(),
                ColumnDef::new("value", "NUMBER"),
            ],
        ),
    ];
    assert!(run(tables).is_empty());
}

#[test]
fn test_generic_id_trap_without_declared_keys() {
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "METRICS",
            vec![
                ColumnDef::new("id", "NUMBER"),
                ColumnDef::new("value", "NUMBER"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "READINGS",
            vec![
                ColumnDef::new("id", "NUMBER"),
                ColumnDef::new("value", "NUMBER"),
            ],
        ),
    ];
    assert!(run(tables).is_empty());
}

#[test]
fn test_generic_prefixed_id_does_not_cross_join() {
    // `c_id` normalizes to a bare ID; an exact name match across unrelated
    // tables must still be suppressed.
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "GADGETS",
            vec![
                ColumnDef::new("c_id", "NUMBER"),
                ColumnDef::new("payload", "STRING"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "WIDGETS",
            vec![
                ColumnDef::new("c_id", "NUMBER").primary_key(),
                ColumnDef::new("label", "STRING"),
            ],
        ),
    ];
    assert!(run(tables).is_empty());
}

#[test]
fn test_generic_id_with_semantic_prefix_survives() {
    // C_ID is generic on its own, but the C prefix resolves to CUSTOMER.
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "PROFILES",
            vec![
                ColumnDef::new("c_id", "NUMBER"),
                ColumnDef::new("bio", "STRING"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "CUSTOMERS",
            vec![
                ColumnDef::new("c_id", "NUMBER").primary_key(),
                ColumnDef::new("full_name", "STRING"),
            ],
        ),
    ];
    let names = run(tables);
    assert_eq!(names, vec!["PROFILES_TO_CUSTOMERS".to_string()]);
}

#[test]
fn test_self_reference_is_not_emitted() {
    let tables = vec![TableDef::new(
        "OFFLINE",
        "PUBLIC",
        "ACCOUNTS",
        vec![
            ColumnDef::new("account_id", "NUMBER").primary_key(),
            ColumnDef::new("parent_account_id", "NUMBER"),
        ],
    )];
    assert!(run(tables).is_empty());
}

#[test]
fn test_self_reference_suppressed_even_with_other_tables() {
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "ACCOUNTS",
            vec![
                ColumnDef::new("account_id", "NUMBER").primary_key(),
                ColumnDef::new("parent_account_id", "NUMBER"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "BRANCHES",
            vec![ColumnDef::new("branch_id", "NUMBER").primary_key()],
        ),
    ];
    let names = run(tables);
    assert!(
        !names.iter().any(|n| n == "ACCOUNTS_TO_ACCOUNTS"),
        "self reference leaked: {names:?}"
    );
}

#[test]
fn test_suffix_only_similarity_is_rejected() {
    // match_key and latch_key differ by one letter; nothing but the KEY
    // suffix relates them.
    let tables = vec![
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "BATCHES",
            vec![
                ColumnDef::new("batch_key", "NUMBER").primary_key(),
                ColumnDef::new("match_key", "NUMBER"),
            ],
        ),
        TableDef::new(
            "OFFLINE",
            "PUBLIC",
            "LATCHES",
            vec![ColumnDef::new("latch_key", "NUMBER").primary_key()],
        ),
    ];
    assert!(run(tables).is_empty());
}
