//! Managed Chrome/Chromium over CDP for one interactive automation run.
//!
//! A [`BrowserSession`] owns a single browser process and a single page for
//! the lifetime of a run: launch with a fixed viewport and user agent, point
//! downloads at a directory, navigate, evaluate injected JavaScript, wait for
//! page conditions, and close the process explicitly at the end.
//!
//! # Example
//!
//! ```ignore
//! use certgrab_browser::{BrowserConfig, BrowserSession};
//!
//! let session = BrowserSession::launch(&BrowserConfig::default()).await?;
//! session.allow_downloads_to(&download_dir).await?;
//! session.goto("https://example.com").await?;
//! let height: i64 = session.eval("document.body.scrollHeight").await?;
//! session.close().await;
//! ```

pub mod detect;
pub mod error;
pub mod session;
pub mod types;

pub use {
    error::BrowserError,
    session::BrowserSession,
    types::BrowserConfig,
};
