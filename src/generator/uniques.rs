//! Unique-key combination.
//!
//! Enumerates every deduplicated set of fields that uniquely identifies an
//! instance of an entity. Each combination becomes one branch of the
//! entity's lookup schema.

use std::collections::HashSet;

use crate::model::{Entity, Field};

/// Collect the unique field combinations of an entity, in emission order:
/// singleton id/unique fields in field order, declared groups, the primary
/// key, then (when the entity has more than one individually unique field)
/// the combined set of all unique fields.
///
/// Combinations are keyed by their sorted, deduplicated field names; later
/// duplicates are skipped. A combination naming a field the entity does not
/// have is dropped entirely.
pub(crate) fn unique_combinations(entity: &Entity) -> Vec<Vec<&Field>> {
    let mut candidates: Vec<Vec<String>> = Vec::new();

    for field in &entity.fields {
        if field.is_id || field.is_unique {
            candidates.push(vec![field.name.clone()]);
        }
    }

    for group in &entity.unique_groups {
        candidates.push(group.fields.clone());
    }

    if let Some(pk) = &entity.primary_key {
        candidates.push(pk.clone());
    }

    let unique_names: Vec<String> = entity
        .fields
        .iter()
        .filter(|f| f.is_unique)
        .map(|f| f.name.clone())
        .collect();
    if unique_names.len() > 1 {
        candidates.push(unique_names);
    }

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut combinations = Vec::new();

    for names in candidates {
        let mut key: Vec<String> = names.clone();
        key.sort();
        key.dedup();
        if seen.contains(&key) {
            continue;
        }

        let fields: Option<Vec<&Field>> = names.iter().map(|n| entity.field(n)).collect();
        match fields {
            Some(fields) => {
                seen.insert(key);
                combinations.push(fields);
            }
            // a name that cannot be resolved invalidates the candidate
            None => continue,
        }
    }

    combinations
}
