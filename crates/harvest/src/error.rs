//! Harvest error types.

use {certgrab_browser::BrowserError, thiserror::Error};

/// Listing-level failures. Per-item download failures are not errors; they
/// are counted in the batch report and the loop continues.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("no certificates found on the page")]
    NoCertificates,

    #[error("certificate listing did not load: {0}")]
    ListingTimeout(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a single certificate failed. Logged with context and swallowed by the
/// batch loop.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("download button not found in page")]
    ButtonMissing,

    #[error("download not detected within {0} seconds")]
    DetectionTimeout(u64),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
