use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use crate::api::{ReferenceData, ReportClient, SubmitOutcome};
use crate::report::{ReportForm, ValidationError, validate};
use crate::tui::command::Command;
use crate::tui::widgets::{SelectState, TextInputState};

/// Messages fed into `update()` by the runtime loop.
pub enum Msg {
    Key(KeyEvent),
    ReferenceLoaded(ReferenceData),
    SubmitFinished(SubmitOutcome),
}

/// Which element currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Name,
    Date,
    Row { index: usize, field: RowField },
    AddRow,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowField {
    Activity,
    SubActivity,
    Task,
    Remove,
}

/// The one-line status area under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Idle,
    Note(&'static str),
    Ok(&'static str),
    Err(&'static str),
}

/// Widget-local state for one form row. The row's values live in the form.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowWidgets {
    pub(crate) activity: SelectState,
    pub(crate) sub_activity: SelectState,
    pub(crate) task: TextInputState,
}

impl RowWidgets {
    fn new(activity_count: usize) -> Self {
        let mut widgets = Self::default();
        widgets.activity.set_option_count(activity_count);
        widgets
    }
}

/// The report entry screen: a name selector, a date field, repeatable
/// activity rows and a submit button, driven entirely by key messages.
pub struct ReportApp {
    client: ReportClient,
    reference: ReferenceData,
    pub(crate) form: ReportForm,
    pub(crate) focus: Focus,
    pub(crate) status: Status,
    pub(crate) submitting: bool,
    pub(crate) name_select: SelectState,
    pub(crate) date_input: TextInputState,
    pub(crate) rows: Vec<RowWidgets>,
    /// Vertical scroll of the form viewport, maintained by the view.
    pub(crate) scroll: usize,
}

impl ReportApp {
    /// Build the initial screen and the startup command that fetches the
    /// dropdown datasets. The form is usable while the fetch is in flight;
    /// the selectors stay empty until it lands.
    pub fn new(client: ReportClient, today: NaiveDate) -> (Self, Command<Msg>) {
        let form = ReportForm::new(today);
        let mut date_input = TextInputState::new();
        date_input.set_cursor_to_end(&form.date);

        let loader = client.clone();
        let app = Self {
            client,
            reference: ReferenceData::default(),
            form,
            focus: Focus::Name,
            status: Status::Idle,
            submitting: false,
            name_select: SelectState::new(),
            date_input,
            rows: vec![RowWidgets::default()],
            scroll: 0,
        };
        let load = Command::perform(
            async move { loader.load_reference().await },
            Msg::ReferenceLoaded,
        );
        (app, load)
    }

    pub fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::ReferenceLoaded(reference) => {
                info!(
                    "Reference data ready: {} names, {} activities",
                    reference.names.len(),
                    reference.activity_tree.activities().len()
                );
                self.reference = reference;
                self.name_select
                    .set_option_count(self.reference.names.len());
                let activity_count = self.reference.activity_tree.activities().len();
                for row in &mut self.rows {
                    row.activity.set_option_count(activity_count);
                }
                Command::None
            }
            Msg::Key(key) => self.handle_key(key),
            Msg::SubmitFinished(outcome) => {
                self.submitting = false;
                match outcome {
                    SubmitOutcome::Accepted => {
                        self.status = Status::Ok("Submitted! Thank you.");
                        self.reset_form();
                    }
                    SubmitOutcome::Failed(error) => {
                        warn!("Submission failed: {}", error);
                        self.status = Status::Err("Network error. Please try again.");
                    }
                }
                Command::None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Msg> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }

        // An open dropdown captures every key until it closes.
        if self
            .focused_select()
            .is_some_and(|select| select.is_open())
        {
            self.handle_open_dropdown_key(key.code);
            return Command::None;
        }

        match key.code {
            KeyCode::Esc => return Command::Quit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return Command::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return Command::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Name => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.name_select.open();
                }
                Command::None
            }
            Focus::Date => {
                if key.code == KeyCode::Enter {
                    self.focus_next();
                } else if let Some(value) =
                    self.date_input.handle_key(key.code, &self.form.date, Some(10))
                {
                    self.form.date = value;
                }
                Command::None
            }
            Focus::Row { index, field } => self.handle_row_key(index, field, key.code),
            Focus::AddRow => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.add_row();
                }
                Command::None
            }
            Focus::Submit => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    return self.submit();
                }
                Command::None
            }
        }
    }

    fn handle_row_key(&mut self, index: usize, field: RowField, code: KeyCode) -> Command<Msg> {
        match field {
            RowField::Activity => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    if let Some(widgets) = self.rows.get_mut(index) {
                        widgets.activity.open();
                    }
                }
            }
            RowField::SubActivity => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    if let Some(widgets) = self.rows.get_mut(index) {
                        widgets.sub_activity.open();
                    }
                }
            }
            RowField::Task => {
                if code == KeyCode::Enter {
                    self.focus_next();
                } else if let Some(widgets) = self.rows.get_mut(index) {
                    let current = self
                        .form
                        .row(index)
                        .map(|row| row.task.clone())
                        .unwrap_or_default();
                    if let Some(value) = widgets.task.handle_key(code, &current, None) {
                        self.form.set_task(index, value);
                    }
                }
            }
            RowField::Remove => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.remove_row(index);
                }
            }
        }
        Command::None
    }

    /// Keys while the focused dropdown is open: navigate, commit, or close.
    fn handle_open_dropdown_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => {
                if let Some(select) = self.focused_select_mut() {
                    select.navigate_prev();
                }
            }
            KeyCode::Down => {
                if let Some(select) = self.focused_select_mut() {
                    select.navigate_next();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.commit_focused_select(),
            KeyCode::Esc => {
                if let Some(select) = self.focused_select_mut() {
                    select.close();
                }
            }
            _ => {}
        }
    }

    /// Commit the highlighted option of the focused dropdown into the form.
    fn commit_focused_select(&mut self) {
        match self.focus {
            Focus::Name => {
                if let Some(chosen) = self.name_select.select_highlighted() {
                    self.form.name = self.reference.names.get(chosen).cloned();
                }
            }
            Focus::Row { index, field: RowField::Activity } => {
                let options = self.reference.activity_tree.activities();
                let Some(widgets) = self.rows.get_mut(index) else {
                    return;
                };
                if let Some(chosen) = widgets.activity.select_highlighted() {
                    let value = options.get(chosen).cloned();
                    if self.form.set_activity(index, value) {
                        // Activity changed, the old sub-activity choice is void.
                        let count = self
                            .form
                            .sub_activity_options(index, &self.reference.activity_tree)
                            .len();
                        let sub = &mut self.rows[index].sub_activity;
                        sub.clear();
                        sub.set_option_count(count);
                    }
                }
            }
            Focus::Row { index, field: RowField::SubActivity } => {
                let options = self
                    .form
                    .sub_activity_options(index, &self.reference.activity_tree);
                if let Some(widgets) = self.rows.get_mut(index) {
                    if let Some(chosen) = widgets.sub_activity.select_highlighted() {
                        self.form.set_sub_activity(index, options.get(chosen).cloned());
                    }
                }
            }
            _ => {}
        }
    }

    fn add_row(&mut self) {
        self.form.add_row();
        let activity_count = self.reference.activity_tree.activities().len();
        self.rows.push(RowWidgets::new(activity_count));
    }

    fn remove_row(&mut self, index: usize) {
        if self.form.remove_row(index) {
            self.rows.remove(index);
            let clamped = index.min(self.form.row_count() - 1);
            self.focus = Focus::Row {
                index: clamped,
                field: RowField::Remove,
            };
        } else {
            // Last remaining row was cleared in place.
            let activity_count = self.reference.activity_tree.activities().len();
            self.rows[index] = RowWidgets::new(activity_count);
        }
    }

    fn submit(&mut self) -> Command<Msg> {
        if self.submitting {
            // A submission is already in flight.
            return Command::None;
        }

        match validate::validate(&self.form, validate::today_local()) {
            Err(error) => {
                self.status = Status::Err(error.message());
                if error == ValidationError::PastDate {
                    self.focus = Focus::Date;
                }
                Command::None
            }
            Ok(draft) => {
                self.submitting = true;
                self.status = Status::Note("Submitting…");
                let client = self.client.clone();
                Command::perform(
                    async move { client.submit(&draft).await },
                    Msg::SubmitFinished,
                )
            }
        }
    }

    /// Back to a pristine form after a successful submission: name cleared,
    /// date preset to today, a single blank row.
    fn reset_form(&mut self) {
        self.form.reset(validate::today_local());
        self.name_select.clear();
        self.date_input.reset();
        self.date_input.set_cursor_to_end(&self.form.date);
        let activity_count = self.reference.activity_tree.activities().len();
        self.rows = vec![RowWidgets::new(activity_count)];
        self.focus = Focus::Name;
    }

    fn focused_select(&self) -> Option<&SelectState> {
        match self.focus {
            Focus::Name => Some(&self.name_select),
            Focus::Row { index, field: RowField::Activity } => {
                self.rows.get(index).map(|widgets| &widgets.activity)
            }
            Focus::Row { index, field: RowField::SubActivity } => {
                self.rows.get(index).map(|widgets| &widgets.sub_activity)
            }
            _ => None,
        }
    }

    fn focused_select_mut(&mut self) -> Option<&mut SelectState> {
        match self.focus {
            Focus::Name => Some(&mut self.name_select),
            Focus::Row { index, field: RowField::Activity } => {
                self.rows.get_mut(index).map(|widgets| &mut widgets.activity)
            }
            Focus::Row { index, field: RowField::SubActivity } => {
                self.rows.get_mut(index).map(|widgets| &mut widgets.sub_activity)
            }
            _ => None,
        }
    }

    /// Focusable elements in tab order.
    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Name, Focus::Date];
        for index in 0..self.form.row_count() {
            for field in [
                RowField::Activity,
                RowField::SubActivity,
                RowField::Task,
                RowField::Remove,
            ] {
                order.push(Focus::Row { index, field });
            }
        }
        order.push(Focus::AddRow);
        order.push(Focus::Submit);
        order
    }

    fn focus_next(&mut self) {
        let order = self.focus_order();
        let position = order.iter().position(|focus| *focus == self.focus).unwrap_or(0);
        self.focus = order[(position + 1) % order.len()];
    }

    fn focus_prev(&mut self) {
        let order = self.focus_order();
        let position = order.iter().position(|focus| *focus == self.focus).unwrap_or(0);
        self.focus = order[(position + order.len() - 1) % order.len()];
    }

    // Derived option lists the view renders.

    pub(crate) fn name_options(&self) -> &[String] {
        &self.reference.names
    }

    pub(crate) fn activity_options(&self) -> Vec<String> {
        self.reference.activity_tree.activities()
    }

    pub(crate) fn sub_activity_options(&self, index: usize) -> Vec<String> {
        self.form
            .sub_activity_options(index, &self.reference.activity_tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ActivityTree;

    fn reference() -> ReferenceData {
        ReferenceData {
            activity_tree: ActivityTree::from_iter([
                (
                    "Development".to_string(),
                    vec!["Backend".to_string(), "Frontend".to_string()],
                ),
                ("Meetings".to_string(), vec!["Standup".to_string()]),
            ]),
            names: vec!["Ada".to_string(), "Graham".to_string()],
        }
    }

    fn app() -> ReportApp {
        let client = ReportClient::new(
            "https://example.com/exec".to_string(),
            "TOKEN".to_string(),
        );
        let today = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let (mut app, _load) = ReportApp::new(client, today);
        app.update(Msg::ReferenceLoaded(reference()));
        app
    }

    fn press(app: &mut ReportApp, code: KeyCode) -> Command<Msg> {
        app.update(Msg::Key(KeyEvent::from(code)))
    }

    fn fill_first_row(app: &mut ReportApp) {
        app.focus = Focus::Name;
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter); // pick "Ada"

        app.focus = Focus::Row { index: 0, field: RowField::Activity };
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter); // pick "Development"

        app.focus = Focus::Row { index: 0, field: RowField::SubActivity };
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter); // pick "Backend"

        app.focus = Focus::Row { index: 0, field: RowField::Task };
        for c in "ship it".chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_selecting_name_through_keys_updates_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.name.as_deref(), Some("Graham"));
    }

    #[test]
    fn test_dropdowns_stay_shut_before_reference_loads() {
        let client = ReportClient::new(
            "https://example.com/exec".to_string(),
            "TOKEN".to_string(),
        );
        let today = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let (mut app, _load) = ReportApp::new(client, today);

        press(&mut app, KeyCode::Enter);
        assert!(!app.name_select.is_open());
    }

    #[test]
    fn test_open_dropdown_swallows_tab() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.name_select.is_open());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Name);
        assert!(app.name_select.is_open());
    }

    #[test]
    fn test_esc_closes_dropdown_before_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        let command = press(&mut app, KeyCode::Esc);
        assert!(matches!(command, Command::None));
        assert!(!app.name_select.is_open());

        let command = press(&mut app, KeyCode::Esc);
        assert!(matches!(command, Command::Quit));
    }

    #[test]
    fn test_activity_selection_enables_matching_sub_activities() {
        let mut app = app();
        app.focus = Focus::Row { index: 0, field: RowField::Activity };
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // "Development"

        assert_eq!(
            app.form.rows()[0].activity.as_deref(),
            Some("Development")
        );
        assert_eq!(app.rows[0].sub_activity.option_count(), 2);
        assert_eq!(
            app.sub_activity_options(0),
            vec!["Backend".to_string(), "Frontend".to_string()]
        );
    }

    #[test]
    fn test_changing_activity_resets_sub_activity_widget() {
        let mut app = app();
        app.focus = Focus::Row { index: 0, field: RowField::Activity };
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // "Development"
        app.focus = Focus::Row { index: 0, field: RowField::SubActivity };
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter); // "Backend"
        assert_eq!(app.form.rows()[0].sub_activity.as_deref(), Some("Backend"));

        app.focus = Focus::Row { index: 0, field: RowField::Activity };
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter); // "Meetings"

        assert!(app.form.rows()[0].sub_activity.is_none());
        assert_eq!(app.rows[0].sub_activity.selected(), None);
        assert_eq!(app.rows[0].sub_activity.option_count(), 1);
    }

    #[test]
    fn test_typing_updates_task_text() {
        let mut app = app();
        app.focus = Focus::Row { index: 0, field: RowField::Task };
        for c in "wrote docs".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.form.rows()[0].task, "wrote docs");
    }

    #[test]
    fn test_add_row_grows_form_and_widgets_in_step() {
        let mut app = app();
        app.focus = Focus::AddRow;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.row_count(), 2);
        assert_eq!(app.rows.len(), 2);
        assert_eq!(app.rows[1].activity.option_count(), 2);
    }

    #[test]
    fn test_removing_last_row_clears_widgets_in_place() {
        let mut app = app();
        fill_first_row(&mut app);
        app.focus = Focus::Row { index: 0, field: RowField::Remove };
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.row_count(), 1);
        assert!(app.form.rows()[0].activity.is_none());
        assert_eq!(app.rows[0].activity.selected(), None);
        assert_eq!(app.rows[0].sub_activity.option_count(), 0);
    }

    #[test]
    fn test_removing_a_middle_row_refocuses_a_valid_row() {
        let mut app = app();
        app.focus = Focus::AddRow;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.row_count(), 3);

        app.focus = Focus::Row { index: 2, field: RowField::Remove };
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.row_count(), 2);
        assert_eq!(
            app.focus,
            Focus::Row { index: 1, field: RowField::Remove }
        );
    }

    #[test]
    fn test_incomplete_form_reports_missing_fields() {
        let mut app = app();
        app.focus = Focus::Submit;
        let command = press(&mut app, KeyCode::Enter);

        assert!(matches!(command, Command::None));
        assert_eq!(app.status, Status::Err("Please fill all required fields."));
        assert!(!app.submitting);
    }

    #[test]
    fn test_past_date_blocks_submit_and_focuses_date() {
        let mut app = app();
        fill_first_row(&mut app);
        app.form.date = "2000-01-01".to_string();
        app.focus = Focus::Submit;
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.status,
            Status::Err("Past dates are not allowed. Please select today or a future date.")
        );
        assert_eq!(app.focus, Focus::Date);
        assert!(!app.submitting);
    }

    #[test]
    fn test_valid_submit_starts_request_and_sets_guard() {
        let mut app = app();
        fill_first_row(&mut app);
        app.focus = Focus::Submit;
        let command = press(&mut app, KeyCode::Enter);

        assert!(matches!(command, Command::Perform(_)));
        assert!(app.submitting);
        assert_eq!(app.status, Status::Note("Submitting…"));
    }

    #[test]
    fn test_submit_while_in_flight_is_ignored() {
        let mut app = app();
        fill_first_row(&mut app);
        app.focus = Focus::Submit;
        assert!(matches!(press(&mut app, KeyCode::Enter), Command::Perform(_)));
        assert!(matches!(press(&mut app, KeyCode::Enter), Command::None));
        assert_eq!(app.status, Status::Note("Submitting…"));
    }

    #[test]
    fn test_accepted_submission_resets_the_form() {
        let mut app = app();
        fill_first_row(&mut app);
        app.focus = Focus::Submit;
        press(&mut app, KeyCode::Enter);

        app.update(Msg::SubmitFinished(SubmitOutcome::Accepted));
        assert_eq!(app.status, Status::Ok("Submitted! Thank you."));
        assert!(!app.submitting);
        assert!(app.form.name.is_none());
        assert_eq!(app.form.row_count(), 1);
        assert!(app.form.rows()[0].activity.is_none());
        assert!(app.form.rows()[0].task.is_empty());
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.focus, Focus::Name);
    }

    #[test]
    fn test_failed_submission_keeps_edits_and_releases_guard() {
        let mut app = app();
        fill_first_row(&mut app);
        app.focus = Focus::Submit;
        press(&mut app, KeyCode::Enter);

        app.update(Msg::SubmitFinished(SubmitOutcome::Failed(
            "connection refused".to_string(),
        )));
        assert_eq!(app.status, Status::Err("Network error. Please try again."));
        assert!(!app.submitting);
        assert_eq!(app.form.rows()[0].task, "ship it");

        // The guard is released, a retry goes out again.
        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            Command::Perform(_)
        ));
    }

    #[test]
    fn test_tab_cycles_through_every_element_and_wraps() {
        let mut app = app();
        let mut seen = vec![app.focus];
        for _ in 0..7 {
            press(&mut app, KeyCode::Tab);
            seen.push(app.focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::Name,
                Focus::Date,
                Focus::Row { index: 0, field: RowField::Activity },
                Focus::Row { index: 0, field: RowField::SubActivity },
                Focus::Row { index: 0, field: RowField::Task },
                Focus::Row { index: 0, field: RowField::Remove },
                Focus::AddRow,
                Focus::Submit,
            ]
        );
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Name);
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = app();
        app.focus = Focus::Row { index: 0, field: RowField::Task };
        let command = app.update(Msg::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(matches!(command, Command::Quit));
    }

    #[test]
    fn test_date_field_accepts_typed_digits_up_to_length() {
        let mut app = app();
        app.focus = Focus::Date;
        // Field starts full at 10 chars, extra typing is rejected.
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.form.date.len(), 10);

        for _ in 0..2 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.form.date, "2099-01-15");
    }
}
