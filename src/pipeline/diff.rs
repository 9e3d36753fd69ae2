//! Diff calculation between two snapshots of a board.
//!
//! Jobs are matched by id only. Title, url and company may drift between
//! runs without a job counting as changed.

use crate::models::Job;

/// Jobs added and removed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// In current, id absent from previous
    pub added: Vec<Job>,
    /// In previous, id absent from current
    pub removed: Vec<Job>,
}

impl Delta {
    /// Compute the delta from `previous` to `current`.
    pub fn between(previous: &[Job], current: &[Job]) -> Self {
        Self {
            added: new_items(current, previous),
            removed: deleted_items(previous, current),
        }
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Jobs of `current` whose id does not appear in `previous`, in `current` order.
pub fn new_items(current: &[Job], previous: &[Job]) -> Vec<Job> {
    missing_from(current, previous)
}

/// Jobs of `previous` whose id does not appear in `current`, in `previous` order.
pub fn deleted_items(previous: &[Job], current: &[Job]) -> Vec<Job> {
    missing_from(previous, current)
}

fn missing_from(items: &[Job], other: &[Job]) -> Vec<Job> {
    items
        .iter()
        .filter(|item| !other.iter().any(|o| o.same_listing(item)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobId;

    fn make_job(id: i64, title: &str) -> Job {
        Job::new(id, title, format!("https://example.com/{id}"), "Acme")
    }

    fn ids(jobs: &[Job]) -> Vec<JobId> {
        jobs.iter().map(|j| j.id.clone()).collect()
    }

    #[test]
    fn test_no_changes() {
        let prev = vec![make_job(1, "Title 1"), make_job(2, "Title 2")];
        let curr = prev.clone();

        let delta = Delta::between(&prev, &curr);
        assert!(!delta.has_changes());
        assert_eq!(delta.change_count(), 0);
    }

    #[test]
    fn test_field_drift_is_not_a_change() {
        let prev = vec![make_job(1, "Engineer")];
        let curr = vec![Job::new(1, "Staff Engineer", "https://moved", "Acme Corp")];

        assert!(!Delta::between(&prev, &curr).has_changes());
    }

    #[test]
    fn test_additions_keep_current_order() {
        let prev = vec![make_job(1, "Title 1")];
        let curr = vec![
            make_job(4, "Title 4"),
            make_job(1, "Title 1"),
            make_job(2, "Title 2"),
        ];

        let added = new_items(&curr, &prev);
        assert_eq!(ids(&added), vec![JobId::from(4), JobId::from(2)]);
    }

    #[test]
    fn test_removals_keep_previous_order() {
        let prev = vec![make_job(3, "c"), make_job(1, "a"), make_job(2, "b")];
        let curr = vec![make_job(1, "a")];

        let removed = deleted_items(&prev, &curr);
        assert_eq!(ids(&removed), vec![JobId::from(3), JobId::from(2)]);
    }

    #[test]
    fn test_mixed_changes() {
        let prev = vec![make_job(1, "One"), make_job(2, "Two")];
        let curr = vec![make_job(2, "Two"), make_job(3, "Three")];

        let delta = Delta::between(&prev, &curr);
        assert_eq!(ids(&delta.added), vec![JobId::from(3)]);
        assert_eq!(ids(&delta.removed), vec![JobId::from(1)]);
    }

    #[test]
    fn test_added_and_removed_are_disjoint() {
        let prev = vec![make_job(1, "a"), make_job(2, "b"), make_job(5, "e")];
        let curr = vec![make_job(2, "b"), make_job(3, "c"), make_job(5, "x")];

        let delta = Delta::between(&prev, &curr);
        for job in &delta.added {
            assert!(!delta.removed.iter().any(|r| r.same_listing(job)));
        }
    }

    #[test]
    fn test_empty_to_full() {
        let prev: Vec<Job> = vec![];
        let curr = vec![make_job(1, "First Job")];

        let delta = Delta::between(&prev, &curr);
        assert_eq!(ids(&delta.added), vec![JobId::from(1)]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_full_to_empty() {
        let prev = vec![make_job(1, "Last Job"), make_job(2, "Other")];
        let curr: Vec<Job> = vec![];

        let delta = Delta::between(&prev, &curr);
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, prev);
    }
}
