use std::sync::{PoisonError, RwLock};

/// A rendered page that can be inspected repeatedly while it keeps changing.
pub trait Document: Send + Sync {
    fn url(&self) -> String;
    /// Serialized markup of the page as it looks right now.
    fn html(&self) -> String;
}

/// A page snapshot that never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDocument {
    url: String,
    html: String,
}

impl StaticDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

impl Document for StaticDocument {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn html(&self) -> String {
        self.html.clone()
    }
}

/// A page whose markup is replaced as the site renders incrementally.
#[derive(Debug, Default)]
pub struct LiveDocument {
    url: RwLock<String>,
    html: RwLock<String>,
}

impl LiveDocument {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: RwLock::new(url.into()),
            html: RwLock::new(String::new()),
        }
    }

    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write().unwrap_or_else(PoisonError::into_inner) = html.into();
    }

    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.write().unwrap_or_else(PoisonError::into_inner) = url.into();
    }
}

impl Document for LiveDocument {
    fn url(&self) -> String {
        self.url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn html(&self) -> String {
        self.html
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
