use crate::error::GENERIC_ERROR_MESSAGE;

/// Lifecycle of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl ViewStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewStatus::Loading)
    }

    /// Text to show, present only in the error state
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            ViewStatus::Error => Some(GENERIC_ERROR_MESSAGE),
            _ => None,
        }
    }
}
