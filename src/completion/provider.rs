//! Keyboard selection over the suggestion dropdown.

/// Suggestions currently shown, with an optional highlighted entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    items: Vec<String>,
    active: Option<usize>,
}

impl SuggestionList {
    /// Create a list with nothing highlighted
    pub fn new(items: Vec<String>) -> Self {
        Self { items, active: None }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Text of the highlighted suggestion
    pub fn active(&self) -> Option<&str> {
        self.active.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Move the highlight down, wrapping to the top
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.active = match self.active {
            Some(i) if i + 1 < self.items.len() => Some(i + 1),
            Some(_) => Some(0),
            None => Some(0),
        };
    }

    /// Move the highlight up, wrapping to the bottom
    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.active = match self.active {
            Some(i) if i > 0 => Some(i - 1),
            _ => Some(self.items.len() - 1),
        };
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }
}
