//! Entity dictionary and business-relationship priors.
//!
//! The dictionary maps canonical entity names to accepted variants and
//! abbreviations (`CUSTOMER` ↔ `CUST`, `C`), so that prefixed warehouse
//! columns and abbreviated identifiers resolve to the same entity. The
//! priors table carries known business relationships as ordered
//! `(pk_entity, fk_entity)` pairs with a default prior score.
//!
//! Both tables are engine parameters, not hard-coded policy: callers overlay
//! their own entries on top of the built-ins to tune for a domain.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::inflection::same_word;

/// Prior returned when only the reverse direction of a pair is known.
const REVERSE_PRIOR: f64 = 0.3;
/// Prior returned for entirely unknown table pairs.
const UNKNOWN_PRIOR: f64 = 0.1;

static BUILTIN_ENTITIES: Lazy<EntityDictionary> = Lazy::new(|| {
    let mut dict = EntityDictionary::empty();
    dict.add_entity("CUSTOMER", &["CUST", "C", "CLIENT", "CLIENTS", "CUSTOMERS"]);
    dict.add_entity("SUPPLIER", &["SUPP", "S", "VENDOR", "VENDORS", "SUPPLIERS"]);
    dict.add_entity("PART", &["P", "PARTS"]);
    dict.add_entity("ORDERS", &["ORDER", "O", "ORD", "PURCHASE", "PURCHASES"]);
    dict.add_entity("LINEITEM", &["LINE", "L", "LINEITEMS", "LINE_ITEM", "LINE_ITEMS"]);
    dict.add_entity("PARTSUPP", &["PS"]);
    dict.add_entity("NATION", &["N", "NATIONS"]);
    dict.add_entity("REGION", &["R", "REGIONS"]);
    dict.add_entity("PRODUCT", &["PROD", "ITEM", "ITEMS", "PRODUCTS"]);
    dict.add_entity("EMPLOYEE", &["EMP", "STAFF", "EMPLOYEES"]);
    dict.add_entity("DEPARTMENT", &["DEPT", "DEPARTMENTS"]);
    dict.add_entity("PROJECT", &["PROJ", "PROJECTS"]);
    dict.add_entity("CATEGORY", &["CAT", "CATEGORIES"]);
    dict.add_entity("LOCATION", &["LOC", "ADDRESS", "ADDRESSES", "LOCATIONS"]);
    dict.add_entity("USER", &["USR", "USERS"]);
    dict.add_entity("ACCOUNT", &["ACCT", "ACCOUNTS"]);
    dict.add_entity("SESSION", &["SESSIONS"]);
    dict.add_entity("INVOICE", &["INV", "INVOICES"]);
    dict.add_entity("PAYMENT", &["PAY", "PMT", "PAYMENTS"]);
    dict.add_entity("WAREHOUSE", &["WH", "WHS", "WAREHOUSES"]);
    dict.add_entity("INVENTORY", &["STOCK", "INVENTORIES"]);
    dict.add_entity("DATE", &["DT", "DATES"]);
    dict
});

static BUILTIN_PRIORS: Lazy<BusinessPriors> = Lazy::new(|| {
    let mut priors = BusinessPriors::empty();
    priors.add("CUSTOMER", "ORDERS", 0.95);
    priors.add("ORDERS", "LINEITEM", 0.95);
    priors.add("PART", "LINEITEM", 0.90);
    priors.add("SUPPLIER", "LINEITEM", 0.90);
    priors.add("PART", "PARTSUPP", 0.95);
    priors.add("SUPPLIER", "PARTSUPP", 0.95);
    priors.add("NATION", "CUSTOMER", 0.85);
    priors.add("NATION", "SUPPLIER", 0.85);
    priors.add("REGION", "NATION", 0.90);
    priors.add("DEPARTMENT", "EMPLOYEE", 0.90);
    priors.add("DEPARTMENT", "PROJECT", 0.85);
    priors.add("CATEGORY", "PRODUCT", 0.80);
    priors.add("USER", "SESSION", 0.85);
    priors.add("CUSTOMER", "INVOICE", 0.80);
    priors.add("ORDERS", "PAYMENT", 0.80);
    priors.add("CUSTOMER", "PAYMENT", 0.75);
    priors.add("WAREHOUSE", "INVENTORY", 0.80);
    priors.add("PRODUCT", "INVENTORY", 0.80);
    priors
});

/// Mapping from canonical entity names to accepted variants.
#[derive(Debug, Clone, Default)]
pub struct EntityDictionary {
    /// canonical -> accepted variants (upper-cased)
    entries: HashMap<String, Vec<String>>,
    /// variant -> canonical (upper-cased)
    reverse: HashMap<String, String>,
}

impl EntityDictionary {
    /// An empty dictionary with no entities.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in dictionary of typical commercial, financial and
    /// warehouse terms, as an overlay base.
    pub fn builtin() -> Self {
        BUILTIN_ENTITIES.clone()
    }

    /// Register an entity and its accepted variants.
    ///
    /// Later registrations win on variant collisions, which lets callers
    /// repurpose an abbreviation the built-ins already claimed.
    pub fn add_entity(&mut self, canonical: &str, variants: &[&str]) {
        let canonical = canonical.to_uppercase();
        let mut stored: Vec<String> = Vec::with_capacity(variants.len());
        for variant in variants {
            let upper = variant.to_uppercase();
            self.reverse.insert(upper.clone(), canonical.clone());
            stored.push(upper);
        }
        self.reverse.insert(canonical.clone(), canonical.clone());
        self.entries.insert(canonical, stored);
    }

    /// Resolve a name to its canonical entity, if known.
    ///
    /// Falls back to the singular form for plural names, so `ORDERS` and
    /// `PURCHASES` resolve even when only the singular variant is listed.
    pub fn canonical_of(&self, name: &str) -> Option<&str> {
        let upper = name.to_uppercase();
        if let Some(canonical) = self.reverse.get(&upper) {
            return Some(canonical.as_str());
        }
        if upper.len() > 3 && upper.ends_with('S') {
            let singular = super::inflection::singularize(&upper).to_uppercase();
            if let Some(canonical) = self.reverse.get(&singular) {
                return Some(canonical.as_str());
            }
        }
        None
    }

    /// Whether two entity tokens name the same thing.
    ///
    /// True when they are equal, map to the same canonical, one maps to the
    /// other, or they differ only in pluralization.
    pub fn are_variants(&self, a: &str, b: &str) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        let a_upper = a.to_uppercase();
        let b_upper = b.to_uppercase();
        if a_upper == b_upper {
            return true;
        }

        let a_canon = self.canonical_of(&a_upper);
        let b_canon = self.canonical_of(&b_upper);
        match (a_canon, b_canon) {
            (Some(ca), Some(cb)) => ca == cb,
            (Some(ca), None) => ca == b_upper || same_word(ca, &b_upper),
            (None, Some(cb)) => cb == a_upper || same_word(cb, &a_upper),
            (None, None) => same_word(&a_upper, &b_upper),
        }
    }

    /// Accepted variants registered for a canonical entity.
    pub fn variants(&self, canonical: &str) -> &[String] {
        self.entries
            .get(&canonical.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Overlay another dictionary's entries on top of this one.
    pub fn extend_from(&mut self, other: &EntityDictionary) {
        for (canonical, variants) in &other.entries {
            let refs: Vec<&str> = variants.iter().map(String::as_str).collect();
            self.add_entity(canonical, &refs);
        }
    }
}

/// Curated business-relationship priors keyed by `(pk_entity, fk_entity)`.
#[derive(Debug, Clone, Default)]
pub struct BusinessPriors {
    entries: HashMap<(String, String), f64>,
}

impl BusinessPriors {
    /// An empty prior table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in prior table for common commercial schemas.
    pub fn builtin() -> Self {
        BUILTIN_PRIORS.clone()
    }

    /// Register a prior for a `(pk_entity, fk_entity)` pair.
    pub fn add(&mut self, pk_entity: &str, fk_entity: &str, prior: f64) {
        self.entries.insert(
            (pk_entity.to_uppercase(), fk_entity.to_uppercase()),
            prior.clamp(0.0, 1.0),
        );
    }

    /// Overlay another prior table's entries on top of this one.
    pub fn extend_from(&mut self, other: &BusinessPriors) {
        for ((pk, fk), prior) in &other.entries {
            self.entries.insert((pk.clone(), fk.clone()), *prior);
        }
    }

    /// Domain-prior score for an FK table pointing at a PK table.
    ///
    /// Entities are canonicalized through the dictionary first. A direct hit
    /// returns the registered prior; a hit in the reverse direction returns
    /// a weak 0.3 (the relationship is known but points the other way);
    /// unknown pairs return a neutral-low 0.1.
    pub fn score(&self, pk_entity: &str, fk_entity: &str, dictionary: &EntityDictionary) -> f64 {
        let pk = dictionary
            .canonical_of(pk_entity)
            .unwrap_or(pk_entity)
            .to_uppercase();
        let fk = dictionary
            .canonical_of(fk_entity)
            .unwrap_or(fk_entity)
            .to_uppercase();

        if let Some(prior) = self.entries.get(&(pk.clone(), fk.clone())) {
            return *prior;
        }
        if self.entries.contains_key(&(fk, pk)) {
            return REVERSE_PRIOR;
        }
        UNKNOWN_PRIOR
    }
}
