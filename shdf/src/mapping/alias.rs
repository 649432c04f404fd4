//! Alias resolution for component-type and pin-name spellings.
//!
//! Documents authored by hand (or by language models) spell the same
//! identifier many ways: "Ground", "ground", "GND". The resolver folds
//! every recognized variant onto one canonical lower-case spelling before
//! any mapping table is consulted.

use std::collections::BTreeMap;

/// Case-folding alias tables for component types and pin names.
///
/// Resolution is a single hop: an alias target is always a canonical
/// spelling, never another alias. Chains are rejected when the tables are
/// built, so `resolve(resolve(x)) == resolve(x)` holds for every input.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    type_aliases: BTreeMap<String, String>,
    pin_aliases: BTreeMap<String, String>,
}

impl AliasResolver {
    /// Build the resolver from raw alias tables (variant -> canonical).
    ///
    /// Keys are lower-cased. Any entry whose target is itself an alias key
    /// (a two-hop chain) is dropped with a warning rather than followed.
    pub fn new(
        type_aliases: BTreeMap<String, String>,
        pin_aliases: BTreeMap<String, String>,
    ) -> Self {
        Self {
            type_aliases: build_table("type", type_aliases),
            pin_aliases: build_table("pin", pin_aliases),
        }
    }

    /// Canonical spelling for a component type. Identity on miss.
    pub fn resolve_type(&self, value: &str) -> String {
        resolve(&self.type_aliases, value)
    }

    /// Canonical spelling for a pin name. Identity on miss.
    pub fn resolve_pin(&self, value: &str) -> String {
        resolve(&self.pin_aliases, value)
    }
}

fn resolve(table: &BTreeMap<String, String>, value: &str) -> String {
    let lower = value.to_lowercase();
    match table.get(&lower) {
        Some(target) => target.clone(),
        None => lower,
    }
}

fn build_table(kind: &str, raw: BTreeMap<String, String>) -> BTreeMap<String, String> {
    // Fold keys to lower-case first so the chain check sees the same
    // spellings resolution will. Variants that collide after folding keep
    // the first entry, like every other table in the mapping layer.
    let mut folded: BTreeMap<String, String> = BTreeMap::new();
    for (variant, target) in raw {
        let variant = variant.to_lowercase();
        let target = target.to_lowercase();
        if let Some(existing) = folded.get(&variant) {
            if *existing != target {
                tracing::warn!(
                    "dropping {} alias {:?} -> {:?}: variant already maps to {:?}",
                    kind,
                    variant,
                    target,
                    existing
                );
            }
            continue;
        }
        folded.insert(variant, target);
    }

    let mut table = BTreeMap::new();
    for (variant, target) in &folded {
        // An identity entry is harmless; a chain is an authoring mistake.
        let chained =
            variant != target && folded.get(target).map(|next| next != target).unwrap_or(false);
        if chained {
            tracing::warn!(
                "dropping {} alias {:?} -> {:?}: target is itself an alias",
                kind,
                variant,
                target
            );
            continue;
        }
        table.insert(variant.clone(), target.clone());
    }
    table
}
