use serde::Deserialize;
use std::collections::BTreeMap;

/// Mapping from activity name to its sub-activities, as served by the
/// `q=activityTree` read endpoint.
///
/// Loaded once per process life and immutable afterwards. Sub-activity lists
/// keep their server order (duplicates included); sorting happens at option
/// derivation, matching what the form shows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ActivityTree {
    entries: BTreeMap<String, Vec<String>>,
}

impl ActivityTree {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Activity names, sorted lexicographically.
    pub fn activities(&self) -> Vec<String> {
        // BTreeMap iteration is already ordered by key.
        self.entries.keys().cloned().collect()
    }

    /// Sub-activity options for `activity`, sorted lexicographically.
    /// Unknown or unset activities yield an empty list.
    pub fn sub_activities(&self, activity: &str) -> Vec<String> {
        let mut subs = self
            .entries
            .get(activity)
            .cloned()
            .unwrap_or_default();
        subs.sort();
        subs
    }
}

impl FromIterator<(String, Vec<String>)> for ActivityTree {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Immutable snapshot of both dropdown datasets, created once at startup and
/// passed explicitly to the form.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub activity_tree: ActivityTree,
    /// User display names in server order.
    pub names: Vec<String>,
}

/// Outcome of a report submission.
///
/// The write endpoint is an opaque cross-origin post: the response body (and
/// any application-level rejection, e.g. a bad token) is not observable.
/// `Accepted` therefore only means the request reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Failed(String),
}
