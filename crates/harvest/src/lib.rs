//! Certificate harvesting: listing discovery, filename sanitization, download
//! detection, and the per-certificate batch loop.
//!
//! The flow mirrors what a person would do on the certificates page: scroll
//! until nothing more lazy-loads, find every list item that carries a title
//! and a download button, then click each button and watch the download
//! directory for the file to land before renaming it after the certificate.

pub mod download;
pub mod error;
pub mod listing;
pub mod sanitize;
pub mod watch;

pub use {
    download::{BatchReport, DownloadPlan, run_batch},
    error::HarvestError,
    listing::{Certificate, discover, load_full_listing},
    sanitize::sanitize_title,
};
