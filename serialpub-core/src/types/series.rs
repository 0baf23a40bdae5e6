//! Series, volume and part records as resolved from the remote catalog

use serde::{Deserialize, Serialize};

/// The top-level work
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Series {
    /// Series title
    pub title: String,

    /// Optional subtitle, rendered after a colon
    pub subtitle: Option<String>,

    /// URL slug supplied by the catalog
    pub slug: Option<String>,
}

impl Series {
    /// Create a series with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            slug: None,
        }
    }

    /// Set the subtitle
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the catalog slug
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Title including the subtitle, if any
    pub fn full_title(&self) -> String {
        match &self.subtitle {
            Some(subtitle) if !subtitle.is_empty() => format!("{}: {}", self.title, subtitle),
            _ => self.title.clone(),
        }
    }
}

/// A collection of parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volume {
    /// Internal volume number (not always the displayed one)
    pub num: u32,

    /// Display title, usually prefixed by the series title
    pub title: String,
}

impl Volume {
    pub fn new(num: u32, title: impl Into<String>) -> Self {
        Self {
            num,
            title: title.into(),
        }
    }
}

/// The smallest released unit of a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    /// Number of the volume this part belongs to
    pub volume: u32,

    /// Number of the part inside its volume
    pub num_in_volume: u32,

    /// Display title
    pub title: String,
}

impl Part {
    pub fn new(volume: u32, num_in_volume: u32, title: impl Into<String>) -> Self {
        Self {
            volume,
            num_in_volume,
            title: title.into(),
        }
    }
}
