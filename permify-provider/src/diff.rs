//! Bundle set difference by name.

use std::collections::HashSet;

use crate::models::BundleModel;

/// Bundles of `previous` whose name does not appear in `current`, in `previous` order.
///
/// A bulk write never deletes names it omits, so these must be deleted explicitly.
pub fn removed(previous: &[BundleModel], current: &[BundleModel]) -> Vec<BundleModel> {
    let keep: HashSet<&str> = current.iter().map(|b| b.name.as_str()).collect();
    previous
        .iter()
        .filter(|b| !keep.contains(b.name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundles(names: &[&str]) -> Vec<BundleModel> {
        names
            .iter()
            .map(|n| BundleModel {
                name: n.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn names(bundles: &[BundleModel]) -> Vec<&str> {
        bundles.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_removed_keeps_previous_order() {
        let previous = bundles(&["d", "a", "c", "b"]);
        let current = bundles(&["c", "x"]);
        assert_eq!(names(&removed(&previous, &current)), vec!["d", "a", "b"]);
    }

    #[test]
    fn test_removed_from_self_is_empty() {
        let all = bundles(&["a", "b", "c"]);
        assert!(removed(&all, &all).is_empty());
    }

    #[test]
    fn test_removed_against_empty_is_everything() {
        let all = bundles(&["a", "b", "c"]);
        assert_eq!(removed(&all, &[]), all);
    }

    #[test]
    fn test_rename_counts_as_removal() {
        let previous = bundles(&["old_name"]);
        let current = bundles(&["new_name"]);
        assert_eq!(names(&removed(&previous, &current)), vec!["old_name"]);
    }

    #[test]
    fn test_content_changes_are_not_removals() {
        let previous = bundles(&["a"]);
        let mut current = bundles(&["a"]);
        current[0].arguments = vec!["userID".into()];
        assert!(removed(&previous, &current).is_empty());
    }
}
