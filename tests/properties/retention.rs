//! Retention planning invariants

use std::collections::HashSet;
use std::time::{Duration, UNIX_EPOCH};

use proptest::prelude::*;

use shipyard::domain::services::{plan_prune, ReleaseEntry};
use shipyard::domain::value_objects::RetentionPolicy;

fn entries_strategy() -> impl Strategy<Value = Vec<ReleaseEntry>> {
    prop::collection::btree_map("[0-9a-f]{7}", 0u64..1_000, 0..12).prop_map(|m| {
        m.into_iter()
            .map(|(name, secs)| ReleaseEntry::new(name, UNIX_EPOCH + Duration::from_secs(secs)))
            .collect()
    })
}

proptest! {
    #[test]
    fn protected_releases_are_never_removed(
        entries in entries_strategy(),
        max_keep in 1usize..6,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..3),
    ) {
        let protected: Vec<&str> = if entries.is_empty() {
            Vec::new()
        } else {
            picks.iter().map(|i| entries[i.index(entries.len())].name.as_str()).collect()
        };
        let plan = plan_prune(&entries, &protected, RetentionPolicy::new(max_keep).unwrap());

        for name in &protected {
            prop_assert!(!plan.remove.iter().any(|r| r == name));
        }
    }

    #[test]
    fn plan_partitions_the_entries(entries in entries_strategy(), max_keep in 1usize..6) {
        let plan = plan_prune(&entries, &[], RetentionPolicy::new(max_keep).unwrap());

        let all: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let planned: HashSet<&str> = plan
            .remove
            .iter()
            .chain(plan.keep.iter())
            .map(String::as_str)
            .collect();
        prop_assert_eq!(all, planned);
        prop_assert_eq!(plan.remove.len() + plan.keep.len(), entries.len());
        prop_assert_eq!(plan.keep.len(), entries.len().min(max_keep));
        prop_assert_eq!(plan.over_budget, 0);
    }

    #[test]
    fn removal_is_oldest_first(entries in entries_strategy(), max_keep in 1usize..6) {
        let plan = plan_prune(&entries, &[], RetentionPolicy::new(max_keep).unwrap());
        let modified = |name: &str| {
            entries.iter().find(|e| e.name == name).map(|e| e.modified).unwrap()
        };

        for removed in &plan.remove {
            for kept in &plan.keep {
                prop_assert!(modified(removed) <= modified(kept));
            }
        }
    }

    #[test]
    fn kept_count_never_drops_below_protected(
        entries in entries_strategy(),
        max_keep in 1usize..4,
    ) {
        let protected: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        let plan = plan_prune(&entries, &protected, RetentionPolicy::new(max_keep).unwrap());

        prop_assert!(plan.remove.is_empty());
        prop_assert_eq!(plan.over_budget, entries.len().saturating_sub(max_keep));
    }
}

#[test]
fn zero_retention_is_rejected() {
    assert!(RetentionPolicy::new(0).is_err());
}
