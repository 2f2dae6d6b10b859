//! Extension de pmoconfig pour le navigateur
//!
//! ```yaml
//! browser:
//!   default_page_size: 50
//!   search:
//!     timeout_ms: 0   # 0 = pas de limite
//! ```

use crate::settings::{BrowserSettings, DEFAULT_PAGE_SIZE};
use serde_yaml::Value;
use std::time::Duration;

/// Trait d'extension pour pmoconfig::Config
pub trait BrowserConfigExt {
    /// Délai maximal d'une recherche, `None` si non borné
    fn browser_search_timeout(&self) -> Option<Duration>;

    /// Taille de page par défaut
    fn browser_default_page_size(&self) -> u32;

    /// Réglages complets du navigateur
    fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            search_timeout: self.browser_search_timeout(),
            default_page_size: self.browser_default_page_size(),
        }
    }
}

impl BrowserConfigExt for pmoconfig::Config {
    fn browser_search_timeout(&self) -> Option<Duration> {
        match self.get_value(&["browser", "search", "timeout_ms"]) {
            Ok(Value::Number(n)) => match n.as_u64() {
                Some(0) | None => None,
                Some(ms) => Some(Duration::from_millis(ms)),
            },
            _ => None,
        }
    }

    fn browser_default_page_size(&self) -> u32 {
        match self.get_value(&["browser", "default_page_size"]) {
            Ok(Value::Number(n)) => n
                .as_u64()
                .and_then(|size| u32::try_from(size).ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}
