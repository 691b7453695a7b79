/// State for a dropdown selector.
///
/// Holds only widget-local state (open flag, highlight, selection index); the
/// chosen value itself lives in the form. `selected == None` renders the
/// placeholder, matching a selector nobody has touched yet.
#[derive(Debug, Clone, Default)]
pub struct SelectState {
    selected: Option<usize>,
    is_open: bool,
    highlight: usize,
    option_count: usize,
}

impl SelectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn highlighted(&self) -> usize {
        self.highlight
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    /// Tell the widget how many options it currently has. A selection that
    /// falls outside the new range is cleared back to the placeholder.
    pub fn set_option_count(&mut self, count: usize) {
        self.option_count = count;
        if self.selected.is_some_and(|index| index >= count) {
            self.selected = None;
        }
        if self.highlight >= count {
            self.highlight = count.saturating_sub(1);
        }
    }

    /// Open the dropdown, highlighting the current selection. Opening an
    /// empty dropdown is a no-op.
    pub fn open(&mut self) {
        if self.option_count == 0 {
            return;
        }
        self.is_open = true;
        self.highlight = self.selected.unwrap_or(0);
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Move the highlight down, wrapping at the end.
    pub fn navigate_next(&mut self) {
        if self.option_count > 0 {
            self.highlight = (self.highlight + 1) % self.option_count;
        }
    }

    /// Move the highlight up, wrapping at the start.
    pub fn navigate_prev(&mut self) {
        if self.option_count > 0 {
            self.highlight = if self.highlight == 0 {
                self.option_count - 1
            } else {
                self.highlight - 1
            };
        }
    }

    /// Commit the highlighted option and close. Returns the chosen index, or
    /// None when the dropdown wasn't open.
    pub fn select_highlighted(&mut self) -> Option<usize> {
        if !self.is_open {
            return None;
        }
        self.selected = Some(self.highlight);
        self.close();
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.option_count {
            self.selected = Some(index);
            self.highlight = index;
        }
    }

    /// Back to the placeholder, dropdown closed. Option count is kept.
    pub fn clear(&mut self) {
        self.selected = None;
        self.highlight = 0;
        self.is_open = false;
    }
}
