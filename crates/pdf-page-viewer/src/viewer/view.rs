use super::state::{LoadStatus, ViewerState};
use crate::constants::PAGE_COUNT_PLACEHOLDER;
use crate::payload::PageNumber;

/// Everything the widget needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: PageNumber,
    pub status_text: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub status: LoadStatus,
}

impl PageView {
    pub fn from_state(state: &ViewerState) -> Self {
        let total = state
            .page_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| PAGE_COUNT_PLACEHOLDER.to_string());

        Self {
            page: state.current_page,
            status_text: format!("Page {} of {}", state.current_page, total),
            previous_enabled: state.can_go_previous(),
            next_enabled: state.can_go_next(),
            status: state.status.clone(),
        }
    }

    pub fn show_page(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
