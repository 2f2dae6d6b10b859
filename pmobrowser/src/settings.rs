//! Réglages du navigateur

use std::time::Duration;

/// Page size used by front-ends that do not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Tunables of [`MediaItemBrowser`](crate::MediaItemBrowser)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Upper bound on a single search computation; `None` waits forever
    pub search_timeout: Option<Duration>,
    pub default_page_size: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            search_timeout: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowserSettings {
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }
}
