use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const DARK_CLASS: &str = "dark-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Font Awesome classes for the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }

    pub fn body_class(self) -> Option<&'static str> {
        matches!(self, Self::Dark).then_some(DARK_CLASS)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
}

/// Durable string storage, `window.localStorage` in the browser.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Only an exact `"dark"` selects the dark theme.
pub fn read_theme(store: &impl KeyValueStore) -> Theme {
    match store.get_item(THEME_KEY).as_deref() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn persist_theme(store: &impl KeyValueStore, theme: Theme) -> Result<(), StoreError> {
    store.set_item(THEME_KEY, theme.as_str())
}
