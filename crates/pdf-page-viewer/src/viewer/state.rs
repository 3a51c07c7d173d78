use crate::payload::PageNumber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Previous,
    Next,
}

impl Offset {
    pub fn delta(self) -> i32 {
        match self {
            Offset::Previous => -1,
            Offset::Next => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    DocumentParsed(u32),
    DocumentFailed(String),
    Navigate(Offset),
    Retry,
}

/// Work the owner of the state must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestParse,
    RequestResize,
    EmitValue(PageNumber),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    pub current_page: PageNumber,
    pub page_count: Option<u32>,
    pub status: LoadStatus,
}

impl ViewerState {
    /// Fresh state for a newly mounted payload, with the effects that kick off parsing.
    pub fn new(start_page: PageNumber) -> (Self, Vec<Effect>) {
        let state = Self {
            current_page: start_page,
            page_count: None,
            status: LoadStatus::Loading,
        };
        (state, vec![Effect::RequestParse])
    }

    pub fn apply(&mut self, event: ViewerEvent) -> Vec<Effect> {
        match event {
            ViewerEvent::DocumentParsed(page_count) => self.document_parsed(page_count),
            ViewerEvent::DocumentFailed(message) => self.document_failed(message),
            ViewerEvent::Navigate(offset) => self.navigate(offset),
            ViewerEvent::Retry => self.retry(),
        }
    }

    fn document_parsed(&mut self, page_count: u32) -> Vec<Effect> {
        if self.page_count.is_some() || self.status != LoadStatus::Loading {
            log::warn!(
                "Ignoring page count {} reported in state {:?}",
                page_count,
                self.status
            );
            return Vec::new();
        }

        self.page_count = Some(page_count);
        self.status = LoadStatus::Loaded;
        vec![Effect::RequestResize]
    }

    fn document_failed(&mut self, message: String) -> Vec<Effect> {
        if self.status != LoadStatus::Loading {
            log::warn!("Ignoring parse failure in state {:?}: {}", self.status, message);
            return Vec::new();
        }

        self.status = LoadStatus::Failed(message);
        vec![Effect::RequestResize]
    }

    // No upper clamp: the Next control is disabled at the last page.
    fn navigate(&mut self, offset: Offset) -> Vec<Effect> {
        self.current_page = self.current_page.offset(offset.delta());
        vec![Effect::EmitValue(self.current_page)]
    }

    fn retry(&mut self) -> Vec<Effect> {
        if !matches!(self.status, LoadStatus::Failed(_)) {
            return Vec::new();
        }

        self.status = LoadStatus::Loading;
        vec![Effect::RequestParse]
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > PageNumber::FIRST
    }

    pub fn can_go_next(&self) -> bool {
        self.page_count
            .is_some_and(|count| self.current_page.get() < count)
    }

    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
