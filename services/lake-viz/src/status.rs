//! User-facing status messages for a dataset view.

use lake_common::DataCategory;
use storage::RetrievalError;

/// Where a dataset view is in its load sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Listing not yet back
    ListingFiles,
    /// Listing failed
    FilesUnavailable,
    /// Listing succeeded but was empty
    NoFiles,
    /// Selected snapshot is being fetched and decoded
    Downloading,
    DownloadFailed,
    Ready,
}

impl ViewState {
    /// Message shown in place of the visualization, `None` once ready.
    pub fn message(&self, category: DataCategory) -> Option<String> {
        let subject = match category {
            DataCategory::Temperature => "water temperature",
            DataCategory::Flow => "water flow",
        };
        let text = match self {
            ViewState::ListingFiles => "Loading".to_string(),
            ViewState::FilesUnavailable => format!("{} is temporarily unavailable", capitalize(subject)),
            ViewState::NoFiles => format!("Zero {} visualizations are available", subject),
            ViewState::Downloading => format!("Downloading {} data", category),
            ViewState::DownloadFailed => format!("Failed to download {} data", category),
            ViewState::Ready => return None,
        };
        Some(text)
    }
}

impl ViewState {
    /// State after a failed listing or snapshot lookup.
    pub fn from_listing_error(err: &RetrievalError) -> Self {
        match err {
            RetrievalError::NoSnapshots(_) => ViewState::NoFiles,
            RetrievalError::NotFound(_) => ViewState::DownloadFailed,
            _ => ViewState::FilesUnavailable,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
