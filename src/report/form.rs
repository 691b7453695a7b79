use chrono::NaiveDate;

use crate::api::models::ActivityTree;

/// One repeatable (activity, sub-activity, task) entry.
///
/// The activity choice constrains the valid domain of the sub-activity
/// choice: it must come from the snapshot's list for that activity, which is
/// why changing the activity drops the sub-activity back to unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEntry {
    pub activity: Option<String>,
    pub sub_activity: Option<String>,
    pub task: String,
}

impl RowEntry {
    pub fn clear(&mut self) {
        *self = RowEntry::default();
    }
}

/// The report being edited: who, for which date, and one or more rows.
///
/// Invariant: at least one row always exists. Removing the last remaining row
/// clears it in place instead of deleting it.
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub name: Option<String>,
    /// Date field text as edited, `YYYY-MM-DD` once valid.
    pub date: String,
    rows: Vec<RowEntry>,
}

impl ReportForm {
    /// A fresh form: no name, date preset to `today`, one blank row.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: None,
            date: today.format("%Y-%m-%d").to_string(),
            rows: vec![RowEntry::default()],
        }
    }

    pub fn rows(&self) -> &[RowEntry] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&RowEntry> {
        self.rows.get(index)
    }

    pub fn add_row(&mut self) {
        self.rows.push(RowEntry::default());
    }

    /// Remove the row at `index`; the last remaining row is cleared in place
    /// instead. Returns true if the row was actually deleted.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        if self.rows.len() > 1 {
            self.rows.remove(index);
            true
        } else {
            self.rows[index].clear();
            false
        }
    }

    /// Set the activity choice for a row, dropping its sub-activity choice
    /// when the activity actually changes. Returns true on change.
    pub fn set_activity(&mut self, index: usize, activity: Option<String>) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        if row.activity == activity {
            return false;
        }
        row.activity = activity;
        row.sub_activity = None;
        true
    }

    pub fn set_sub_activity(&mut self, index: usize, sub_activity: Option<String>) {
        if let Some(row) = self.rows.get_mut(index) {
            row.sub_activity = sub_activity;
        }
    }

    pub fn set_task(&mut self, index: usize, task: String) {
        if let Some(row) = self.rows.get_mut(index) {
            row.task = task;
        }
    }

    /// Sub-activity options currently valid for a row: the sorted list for
    /// its chosen activity, or empty when no activity is chosen.
    pub fn sub_activity_options(&self, index: usize, tree: &ActivityTree) -> Vec<String> {
        self.rows
            .get(index)
            .and_then(|row| row.activity.as_deref())
            .map(|activity| tree.sub_activities(activity))
            .unwrap_or_default()
    }

    /// Back to the pristine state: one blank row, date preset to `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }
}

/// A validated report, ready to encode and post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub name: String,
    pub date: NaiveDate,
    pub rows: Vec<DraftRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRow {
    pub activity: String,
    pub sub_activity: String,
    pub task: String,
}
