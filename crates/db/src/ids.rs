//! Id allocation shared by the stores.
//!
//! Every scheme has the shape `{prefix}-{n}`. They differ in how `n` is picked
//! and which existing ids it must avoid:
//!
//! | Resource    | prefix            | namespace                          | strategy  |
//! |-------------|-------------------|------------------------------------|-----------|
//! | User        | role initial      | users with the same role           | `Count`   |
//! | Patient     | `P`               | all patients                       | `Count`   |
//! | Appointment | `AP`              | appointments + medical records     | `GapFill` |

use crate::collection::Identified;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub const PATIENT_PREFIX: &str = "P";
pub const APPOINTMENT_PREFIX: &str = "AP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Size of the namespace plus one.
    Count,
    /// Smallest positive integer not used as a suffix in the namespace.
    GapFill,
}

/// Allocates a new id under `prefix`, avoiding the ids in `namespace`.
pub fn allocate<'a, I>(prefix: &str, strategy: Strategy, namespace: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let n = match strategy {
        Strategy::Count => namespace.into_iter().count() as u64 + 1,
        Strategy::GapFill => {
            let used: HashSet<u64> = namespace.into_iter().filter_map(numeric_suffix).collect();
            (1..).find(|n| !used.contains(n)).unwrap_or(1)
        }
    };
    format!("{prefix}-{n}")
}

/// First character of the role, upper-cased. Empty for an empty role.
pub fn role_prefix(role: &str) -> String {
    role.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

/// The integer after the first `-`, if it parses.
pub fn numeric_suffix(id: &str) -> Option<u64> {
    id.split('-').nth(1)?.parse().ok()
}

/// Rewrites ids in collection order. `scope` yields the counter key and the
/// prefix for each record, or `None` to leave that record's id alone; each
/// key keeps its own running counter.
pub fn renumber<T, K, F>(records: &mut [T], mut scope: F)
where
    T: Identified,
    K: Eq + Hash,
    F: FnMut(&T) -> Option<(K, String)>,
{
    let mut counters: HashMap<K, u64> = HashMap::new();
    for record in records.iter_mut() {
        let Some((key, prefix)) = scope(record) else {
            continue;
        };
        let n = counters.entry(key).or_insert(0);
        *n += 1;
        *record.id_mut() = format!("{prefix}-{n}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Patient, User};

    fn user(id: &str, role: &str) -> User {
        User {
            id: id.into(),
            role: Some(role.into()),
            ..Default::default()
        }
    }

    #[test]
    fn count_strategy_is_length_plus_one() {
        assert_eq!(allocate("P", Strategy::Count, ["P-1", "P-2"]), "P-3");
        assert_eq!(allocate("P", Strategy::Count, []), "P-1");
    }

    #[test]
    fn gap_fill_takes_the_smallest_free_suffix_across_namespaces() {
        let appointments = ["AP-1", "AP-3"];
        let records = ["MDR-2"];
        let id = allocate(
            APPOINTMENT_PREFIX,
            Strategy::GapFill,
            appointments.into_iter().chain(records),
        );
        assert_eq!(id, "AP-4");

        let id = allocate(APPOINTMENT_PREFIX, Strategy::GapFill, ["AP-1", "AP-3"]);
        assert_eq!(id, "AP-2");
    }

    #[test]
    fn gap_fill_ignores_unparseable_suffixes() {
        let id = allocate(APPOINTMENT_PREFIX, Strategy::GapFill, ["AP-x", "legacy", "AP-2"]);
        assert_eq!(id, "AP-1");
    }

    #[test]
    fn role_prefix_upper_cases_the_first_character() {
        assert_eq!(role_prefix("doctor"), "D");
        assert_eq!(role_prefix("Nurse"), "N");
        assert_eq!(role_prefix(""), "");
    }

    #[test]
    fn numeric_suffix_reads_the_second_segment() {
        assert_eq!(numeric_suffix("AP-12"), Some(12));
        assert_eq!(numeric_suffix("MDR-7"), Some(7));
        assert_eq!(numeric_suffix("AP-1-2"), Some(1));
        assert_eq!(numeric_suffix("AP"), None);
    }

    #[test]
    fn renumber_keeps_one_counter_per_role() {
        let mut users = vec![
            user("D-2", "Doctor"),
            user("N-1", "Nurse"),
            user("D-5", "Doctor"),
            user("N-3", "Nurse"),
        ];
        renumber(&mut users, |u| {
            let role = u.role.as_ref()?.as_str()?.to_string();
            let prefix = role_prefix(&role);
            Some((role, prefix))
        });
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["D-1", "N-1", "D-2", "N-2"]);
    }

    #[test]
    fn renumber_with_a_single_scope_is_positional() {
        let mut patients: Vec<Patient> = ["P-2", "P-4", "P-9"]
            .into_iter()
            .map(|id| Patient {
                id: id.into(),
                ..Default::default()
            })
            .collect();
        renumber(&mut patients, |_| Some(((), PATIENT_PREFIX.to_string())));
        let ids: Vec<_> = patients.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P-1", "P-2", "P-3"]);
    }
}
