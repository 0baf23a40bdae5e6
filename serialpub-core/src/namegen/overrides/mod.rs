//! Per-channel override functions
//!
//! Each channel may be replaced by a function with the fixed signature
//! `(series, volumes, parts, fc) -> name`. A channel without an override
//! falls back to its compiled pipeline.
//!
//! Overrides come either from Rust closures or from a native library
//! exporting `to_title`, `to_filename` and/or `to_folder` (see [`library`]).

pub mod library;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::Channel;
use crate::error::{NamingError, Result};
use crate::types::{Fc, NamingRequest, Part, Series, Volume};

/// Error returned by an override function
pub type OverrideError = Box<dyn std::error::Error + Send + Sync>;

/// An override function for one channel
pub type OverrideFn = Arc<
    dyn Fn(&Series, &[Volume], &[Part], Fc) -> std::result::Result<String, OverrideError>
        + Send
        + Sync,
>;

/// The set of supplied overrides, at most one per channel
#[derive(Clone, Default)]
pub struct Overrides {
    title: Option<OverrideFn>,
    filename: Option<OverrideFn>,
    folder: Option<OverrideFn>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the overrides exported by a native library
    ///
    /// Libraries are cached per path, so loading the same file twice is cheap.
    pub fn load(path: &Path) -> Result<Self> {
        let library = library::load(path)?;
        let mut overrides = Self::new();
        for channel in Channel::ALL {
            if library.exports(channel) {
                let library = Arc::clone(&library);
                overrides = overrides.with(channel, move |series, volumes, parts, fc| {
                    library.call(channel, series, volumes, parts, fc)
                });
            }
        }
        Ok(overrides)
    }

    /// Set the override for a channel
    pub fn with<F>(mut self, channel: Channel, f: F) -> Self
    where
        F: Fn(&Series, &[Volume], &[Part], Fc) -> std::result::Result<String, OverrideError>
            + Send
            + Sync
            + 'static,
    {
        *self.slot_mut(channel) = Some(Arc::new(f));
        self
    }

    pub fn with_title<F>(self, f: F) -> Self
    where
        F: Fn(&Series, &[Volume], &[Part], Fc) -> std::result::Result<String, OverrideError>
            + Send
            + Sync
            + 'static,
    {
        self.with(Channel::Title, f)
    }

    pub fn with_filename<F>(self, f: F) -> Self
    where
        F: Fn(&Series, &[Volume], &[Part], Fc) -> std::result::Result<String, OverrideError>
            + Send
            + Sync
            + 'static,
    {
        self.with(Channel::Filename, f)
    }

    pub fn with_folder<F>(self, f: F) -> Self
    where
        F: Fn(&Series, &[Volume], &[Part], Fc) -> std::result::Result<String, OverrideError>
            + Send
            + Sync
            + 'static,
    {
        self.with(Channel::Folder, f)
    }

    pub fn get(&self, channel: Channel) -> Option<&OverrideFn> {
        match channel {
            Channel::Title => self.title.as_ref(),
            Channel::Filename => self.filename.as_ref(),
            Channel::Folder => self.folder.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Run the override for `channel`, if there is one
    pub fn call(&self, channel: Channel, request: &NamingRequest) -> Option<Result<String>> {
        let f = self.get(channel)?;
        tracing::debug!(channel = %channel, "Use override");
        let result = f(&request.series, &request.volumes, &request.parts, request.fc)
            .map_err(|e| NamingError::ScriptExecution {
                channel,
                message: e.to_string(),
            });
        Some(result)
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut Option<OverrideFn> {
        match channel {
            Channel::Title => &mut self.title,
            Channel::Filename => &mut self.filename,
            Channel::Folder => &mut self.folder,
        }
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("title", &self.title.is_some())
            .field("filename", &self.filename.is_some())
            .field("folder", &self.folder.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NamingRequest {
        NamingRequest::new(
            Series::new("My Series"),
            vec![Volume::new(1, "My Series Volume 1")],
            vec![Part::new(1, 1, "My Series Volume 1 Part 1")],
            Fc::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_only_supplied_channels_are_overridden() {
        let overrides = Overrides::new().with_title(|series, _, parts, _| {
            Ok(format!("{} / {}", series.title, parts[0].title))
        });
        let request = request();
        assert_eq!(
            overrides.call(Channel::Title, &request).unwrap().unwrap(),
            "My Series / My Series Volume 1 Part 1"
        );
        assert!(overrides.call(Channel::Filename, &request).is_none());
        assert!(overrides.call(Channel::Folder, &request).is_none());
    }

    #[test]
    fn test_failure_is_script_execution_error() {
        let overrides = Overrides::new().with_folder(|_, _, _, _| Err("no folder today".into()));
        let err = overrides.call(Channel::Folder, &request()).unwrap().unwrap_err();
        match err {
            NamingError::ScriptExecution { channel, message } => {
                assert_eq!(channel, Channel::Folder);
                assert_eq!(message, "no folder today");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_debug() {
        assert!(Overrides::new().is_empty());
        let overrides = Overrides::new().with_filename(|_, _, _, _| Ok("x".into()));
        assert!(!overrides.is_empty());
        assert_eq!(
            format!("{:?}", overrides),
            "Overrides { title: false, filename: true, folder: false }"
        );
    }
}
