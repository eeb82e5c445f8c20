//! Conversion options.

use std::path::{Path, PathBuf};

/// Options for a conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Embed images as base64 data URIs instead of referencing files.
    pub embedded: bool,
    /// Directory relative image URIs resolve against. Defaults to the
    /// current directory.
    pub base_path: Option<PathBuf>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }
}
