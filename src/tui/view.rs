use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::app::{Focus, ReportApp, RowField, Status};
use crate::tui::widgets::TextInputState;

/// Column where field values start: two indent cells plus the label cell.
const FIELD_X: u16 = 16;
const LABEL_WIDTH: usize = 13;
const DATE_WIDTH: usize = 12;
const TASK_WIDTH: usize = 42;
const DROPDOWN_MAX_ROWS: u16 = 10;

/// An open dropdown recorded while laying out the form, drawn last so it
/// overlays the lines below its selector.
struct DropdownOverlay {
    line: usize,
    options: Vec<String>,
    highlight: usize,
    selected: Option<usize>,
}

pub fn draw(frame: &mut Frame, app: &mut ReportApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "  Work Report",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    let overlay = draw_form(frame, chunks[1], app);
    draw_status(frame, chunks[2], app.status);
    draw_hints(frame, chunks[3], overlay.is_some());

    if let Some(overlay) = overlay {
        draw_dropdown(frame, chunks[1], app.scroll, overlay);
    }
}

/// Lay the form out as one line per field, keep the focused line inside the
/// viewport and render it. Returns the open dropdown, if any.
fn draw_form(frame: &mut Frame, area: Rect, app: &mut ReportApp) -> Option<DropdownOverlay> {
    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0usize;
    let mut overlay: Option<DropdownOverlay> = None;

    // Name selector
    {
        let focused = app.focus == Focus::Name;
        if focused {
            focus_line = lines.len();
        }
        if app.name_select.is_open() {
            overlay = Some(DropdownOverlay {
                line: lines.len(),
                options: app.name_options().to_vec(),
                highlight: app.name_select.highlighted(),
                selected: app.name_select.selected(),
            });
        }
        let spans = select_spans(
            app.form.name.as_deref(),
            "Select your name…",
            app.name_select.is_open(),
            focused,
        );
        lines.push(field_line("Name:", spans, focused));
    }

    // Date field
    {
        let focused = app.focus == Focus::Date;
        if focused {
            focus_line = lines.len();
        }
        let date = app.form.date.clone();
        let mut spans = input_spans(&date, &mut app.date_input, DATE_WIDTH, None, focused);
        spans.push(Span::styled(
            "  YYYY-MM-DD",
            Style::default().add_modifier(Modifier::DIM),
        ));
        lines.push(field_line("Date:", spans, focused));
    }

    let activity_options = app.activity_options();
    for index in 0..app.form.row_count() {
        let entry = app.form.row(index).cloned().unwrap_or_default();
        let sub_options = app.sub_activity_options(index);
        let row_focus = |field: RowField| Focus::Row { index, field };

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("  Row {}", index + 1),
            Style::default().add_modifier(Modifier::DIM),
        )));

        // Activity selector
        {
            let focused = app.focus == row_focus(RowField::Activity);
            if focused {
                focus_line = lines.len();
            }
            let select = &app.rows[index].activity;
            if select.is_open() {
                overlay = Some(DropdownOverlay {
                    line: lines.len(),
                    options: activity_options.clone(),
                    highlight: select.highlighted(),
                    selected: select.selected(),
                });
            }
            let spans = select_spans(
                entry.activity.as_deref(),
                "Select activity...",
                select.is_open(),
                focused,
            );
            lines.push(field_line("Activity:", spans, focused));
        }

        // Sub-activity selector
        {
            let focused = app.focus == row_focus(RowField::SubActivity);
            if focused {
                focus_line = lines.len();
            }
            let select = &app.rows[index].sub_activity;
            if select.is_open() {
                overlay = Some(DropdownOverlay {
                    line: lines.len(),
                    options: sub_options.clone(),
                    highlight: select.highlighted(),
                    selected: select.selected(),
                });
            }
            let spans = select_spans(
                entry.sub_activity.as_deref(),
                "Select sub-activity…",
                select.is_open(),
                focused,
            );
            lines.push(field_line("Sub-activity:", spans, focused));
        }

        // Task text
        {
            let focused = app.focus == row_focus(RowField::Task);
            if focused {
                focus_line = lines.len();
            }
            let spans = input_spans(
                &entry.task,
                &mut app.rows[index].task,
                TASK_WIDTH,
                Some("Describe the task/work done…"),
                focused,
            );
            lines.push(field_line("Task:", spans, focused));
        }

        // Remove button
        {
            let focused = app.focus == row_focus(RowField::Remove);
            if focused {
                focus_line = lines.len();
            }
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(FIELD_X as usize)),
                button_span("✕ Remove", focused, true),
            ]));
        }
    }

    lines.push(Line::default());
    {
        let focused = app.focus == Focus::AddRow;
        if focused {
            focus_line = lines.len();
        }
        lines.push(Line::from(vec![
            Span::raw("  "),
            button_span("+ Add row", focused, true),
        ]));
    }
    lines.push(Line::default());
    {
        let focused = app.focus == Focus::Submit;
        if focused {
            focus_line = lines.len();
        }
        lines.push(Line::from(vec![
            Span::raw("  "),
            button_span("Submit report", focused, !app.submitting),
        ]));
    }

    // Keep the focused line visible.
    let total = lines.len();
    let height = area.height as usize;
    if height == 0 || total <= height {
        app.scroll = 0;
    } else {
        app.scroll = app.scroll.min(total - height);
        if focus_line < app.scroll {
            app.scroll = focus_line;
        } else if focus_line >= app.scroll + height {
            app.scroll = focus_line + 1 - height;
        }
    }

    let paragraph = Paragraph::new(lines).scroll((app.scroll as u16, 0));
    frame.render_widget(paragraph, area);
    overlay
}

fn field_line(label: &str, field: Vec<Span<'static>>, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(
        format!("  {:>width$} ", label, width = LABEL_WIDTH),
        label_style,
    )];
    spans.extend(field);
    Line::from(spans)
}

fn select_spans(
    value: Option<&str>,
    placeholder: &str,
    open: bool,
    focused: bool,
) -> Vec<Span<'static>> {
    let arrow = if open { " ▲" } else { " ▼" };
    let (text, mut style) = match value {
        Some(value) => (value.to_string(), Style::default()),
        None => (
            placeholder.to_string(),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ),
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    vec![Span::styled(format!(" {}{} ", text, arrow), style)]
}

fn input_spans(
    value: &str,
    state: &mut TextInputState,
    width: usize,
    placeholder: Option<&str>,
    focused: bool,
) -> Vec<Span<'static>> {
    if value.is_empty() && !focused {
        if let Some(placeholder) = placeholder {
            return vec![Span::styled(
                format!(" {}", placeholder),
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            )];
        }
    }

    let chars: Vec<char> = value.chars().collect();
    let start = if focused {
        state.update_scroll(width, value);
        state.scroll_offset()
    } else {
        0
    };
    let end = (start + width).min(chars.len());
    let mut visible: Vec<char> = chars[start..end].to_vec();

    if focused {
        let cursor = state.cursor_pos().saturating_sub(start).min(visible.len());
        visible.insert(cursor, '│');
    }

    vec![Span::raw(format!(" {}", visible.into_iter().collect::<String>()))]
}

fn button_span(label: &str, focused: bool, enabled: bool) -> Span<'static> {
    let mut style = Style::default();
    if !enabled {
        style = style.add_modifier(Modifier::DIM);
    }
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!("[ {} ]", label), style)
}

fn draw_status(frame: &mut Frame, area: Rect, status: Status) {
    let (text, style) = match status {
        Status::Idle => return,
        Status::Note(text) => (text, Style::default().fg(Color::Cyan)),
        Status::Ok(text) => (text, Style::default().fg(Color::Green)),
        Status::Err(text) => (text, Style::default().fg(Color::Red)),
    };
    frame.render_widget(
        Paragraph::new(format!("  {}", text)).style(style),
        area,
    );
}

fn draw_hints(frame: &mut Frame, area: Rect, dropdown_open: bool) {
    let hint = if dropdown_open {
        "  ↑/↓ highlight · Enter select · Esc close"
    } else {
        "  Tab/↑/↓ move · Enter open/activate · Esc quit"
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM)),
        area,
    );
}

/// Draw the open dropdown over the form, below its selector when there is
/// room and above it otherwise.
fn draw_dropdown(frame: &mut Frame, viewport: Rect, scroll: usize, overlay: DropdownOverlay) {
    if overlay.options.is_empty() || overlay.line < scroll {
        return;
    }
    let field_y = viewport.y + (overlay.line - scroll) as u16;
    if field_y >= viewport.bottom() {
        return;
    }

    let height = (overlay.options.len() as u16).min(DROPDOWN_MAX_ROWS) + 2;
    let y = if field_y + 1 + height <= frame.area().bottom() {
        field_y + 1
    } else {
        field_y.saturating_sub(height)
    };
    let width = overlay
        .options
        .iter()
        .map(|option| option.chars().count() as u16 + 6)
        .max()
        .unwrap_or(12)
        .clamp(12, viewport.width.saturating_sub(FIELD_X).max(12));
    let area = Rect {
        x: viewport.x + FIELD_X,
        y,
        width,
        height,
    }
    .intersection(frame.area());
    if area.height < 3 {
        return;
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Window the options around the highlight when they overflow.
    let visible = inner.height as usize;
    let start = if overlay.highlight >= visible {
        overlay.highlight + 1 - visible
    } else {
        0
    };
    for (slot, index) in (start..overlay.options.len()).take(visible).enumerate() {
        let line_area = Rect {
            x: inner.x,
            y: inner.y + slot as u16,
            width: inner.width,
            height: 1,
        };
        let (prefix, style) = if index == overlay.highlight {
            ("> ", Style::default().add_modifier(Modifier::REVERSED))
        } else if Some(index) == overlay.selected {
            ("✓ ", Style::default().fg(Color::Green))
        } else {
            ("  ", Style::default())
        };
        frame.render_widget(
            Paragraph::new(format!("{}{}", prefix, overlay.options[index])).style(style),
            line_area,
        );
    }
}
