use chrono::{Local, NaiveDate};

use super::form::{DraftRow, ReportDraft, ReportForm};

/// Why a form cannot be submitted. Exactly one reason is reported at a time,
/// past-date taking precedence over missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    PastDate,
    MissingFields,
}

impl ValidationError {
    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::PastDate => {
                "Past dates are not allowed. Please select today or a future date."
            }
            ValidationError::MissingFields => "Please fill all required fields.",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Today in the user's local timezone, the reference point for the
/// no-past-dates rule.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Check the whole form and produce a draft ready for submission.
///
/// The past-date check runs first and only when the date parses; an
/// unparseable date falls through to the missing-fields check. Whitespace-only
/// text counts as empty.
pub fn validate(form: &ReportForm, today: NaiveDate) -> Result<ReportDraft, ValidationError> {
    let date = parse_date(&form.date);

    if let Some(date) = date {
        if date < today {
            return Err(ValidationError::PastDate);
        }
    }

    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let (Some(name), Some(date)) = (name, date) else {
        return Err(ValidationError::MissingFields);
    };

    let mut rows = Vec::with_capacity(form.row_count());
    for row in form.rows() {
        let activity = row.activity.as_deref().map(str::trim).unwrap_or("");
        let sub_activity = row.sub_activity.as_deref().map(str::trim).unwrap_or("");
        let task = row.task.trim();
        if activity.is_empty() || sub_activity.is_empty() || task.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        rows.push(DraftRow {
            activity: activity.to_string(),
            sub_activity: sub_activity.to_string(),
            task: task.to_string(),
        });
    }

    Ok(ReportDraft {
        name: name.to_string(),
        date,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn filled_form() -> ReportForm {
        let mut form = ReportForm::new(today());
        form.name = Some("Ada Lovelace".to_string());
        form.set_activity(0, Some("Development".to_string()));
        form.set_sub_activity(0, Some("Backend".to_string()));
        form.set_task(0, "Implemented the submit path".to_string());
        form
    }

    #[test]
    fn test_complete_form_validates() {
        let draft = validate(&filled_form(), today()).unwrap();
        assert_eq!(draft.name, "Ada Lovelace");
        assert_eq!(draft.date, today());
        assert_eq!(draft.rows.len(), 1);
        assert_eq!(draft.rows[0].activity, "Development");
        assert_eq!(draft.rows[0].sub_activity, "Backend");
        assert_eq!(draft.rows[0].task, "Implemented the submit path");
    }

    #[test]
    fn test_past_date_rejected() {
        let mut form = filled_form();
        form.date = "2025-06-01".to_string();
        assert_eq!(validate(&form, today()), Err(ValidationError::PastDate));
    }

    #[test]
    fn test_today_and_future_dates_accepted() {
        let mut form = filled_form();
        assert!(validate(&form, today()).is_ok());
        form.date = "2025-06-30".to_string();
        assert!(validate(&form, today()).is_ok());
    }

    #[test]
    fn test_past_date_reported_even_with_missing_fields() {
        let mut form = ReportForm::new(today());
        form.date = "2020-01-01".to_string();
        assert_eq!(validate(&form, today()), Err(ValidationError::PastDate));
    }

    #[test]
    fn test_unparseable_date_reports_missing_fields() {
        let mut form = filled_form();
        form.date = "junk".to_string();
        assert_eq!(
            validate(&form, today()),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut form = filled_form();
        form.name = None;
        assert_eq!(
            validate(&form, today()),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_whitespace_only_task_rejected() {
        let mut form = filled_form();
        form.set_task(0, "   ".to_string());
        assert_eq!(
            validate(&form, today()),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_any_incomplete_row_rejects_the_whole_form() {
        let mut form = filled_form();
        form.add_row();
        form.set_activity(1, Some("Development".to_string()));
        // second row has no sub-activity or task
        assert_eq!(
            validate(&form, today()),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_fields_are_trimmed_in_the_draft() {
        let mut form = filled_form();
        form.name = Some("  Ada  ".to_string());
        form.set_task(0, "  trimmed  ".to_string());
        let draft = validate(&form, today()).unwrap();
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.rows[0].task, "trimmed");
    }
}
