//! Favorites store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Set of favorited job ids.
///
/// Ids are not checked against the job collection; a favorite may point at a
/// job that is not (or no longer) loaded. Join against the live jobs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<JobId>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, id: JobId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = JobId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<JobId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = JobId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_membership() {
        let mut favorites: FavoriteSet = [JobId(1), JobId(4)].into_iter().collect();
        let before = favorites.clone();
        for k in 1..=3 {
            for _ in 0..(2 * k) {
                favorites.toggle(JobId(2));
                favorites.toggle(JobId(4));
            }
            assert_eq!(favorites, before);
        }
    }

    #[test]
    fn toggle_reports_new_membership() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.toggle(JobId(3)));
        assert!(favorites.contains(JobId(3)));
        assert!(!favorites.toggle(JobId(3)));
        assert!(favorites.is_empty());
    }

    #[test]
    fn serializes_as_id_list() {
        let favorites: FavoriteSet = [JobId(2), JobId(0)].into_iter().collect();
        assert_eq!(serde_json::to_string(&favorites).unwrap(), "[0,2]");
    }
}
