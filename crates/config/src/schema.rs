//! Config schema types (site URLs, download handling, browser, timing).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Fixed desktop user agent, matching what the certificate site expects from
/// a regular browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertgrabConfig {
    pub site: SiteSection,
    pub downloads: DownloadsSection,
    pub browser: BrowserSection,
    pub timing: TimingSection,
}

/// Certificate site URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Login page, opened first for the manual authentication step.
    pub sign_in_url: String,
    /// Certificates listing page.
    pub certificates_url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            sign_in_url: "https://web.dio.me/sign-in".into(),
            certificates_url: "https://web.dio.me/certificates".into(),
        }
    }
}

/// Download directory and completion detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsSection {
    /// Directory where certificates are saved. Created if missing.
    pub dir: PathBuf,
    /// How long to wait for each download to appear on disk, in seconds
    /// (polled once per second).
    pub detect_timeout_secs: u64,
    /// Filename suffixes that mark a download still in progress.
    pub in_progress_suffixes: Vec<String>,
}

impl Default for DownloadsSection {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            detect_timeout_secs: 30,
            in_progress_suffixes: vec![".crdownload".into(), ".tmp".into()],
        }
    }
}

/// `~/Downloads/certificados` when a user download dir exists, otherwise
/// `./certificados`.
fn default_download_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|d| d.join("certificados")))
        .unwrap_or_else(|| PathBuf::from("certificados"))
}

/// Browser launch options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Run headless. Off by default: the login is done by a human in the
    /// visible window.
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: false,
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_args: Vec::new(),
            navigation_timeout_ms: 30_000,
        }
    }
}

/// Fixed delays and bounded waits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// Delay after each scroll before re-reading the page height, in seconds.
    pub scroll_settle_secs: u64,
    /// Bounded wait for the certificate listing to render, in seconds.
    pub listing_timeout_secs: u64,
    /// Delay before the browser is closed at the end of a run, in seconds.
    pub wind_down_secs: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            scroll_settle_secs: 3,
            listing_timeout_secs: 40,
            wind_down_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_fixed_literals() {
        let cfg = CertgrabConfig::default();
        assert_eq!(cfg.site.sign_in_url, "https://web.dio.me/sign-in");
        assert_eq!(cfg.site.certificates_url, "https://web.dio.me/certificates");
        assert_eq!(cfg.downloads.detect_timeout_secs, 30);
        assert_eq!(
            cfg.downloads.in_progress_suffixes,
            vec![".crdownload".to_string(), ".tmp".to_string()]
        );
        assert_eq!(cfg.timing.scroll_settle_secs, 3);
        assert_eq!(cfg.timing.listing_timeout_secs, 40);
        assert_eq!(cfg.timing.wind_down_secs, 15);
    }

    #[test]
    fn download_dir_ends_with_certificados() {
        let cfg = DownloadsSection::default();
        assert!(cfg.dir.ends_with("certificados"));
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let cfg: CertgrabConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.site.sign_in_url, SiteSection::default().sign_in_url);
        assert!(!cfg.browser.headless);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: CertgrabConfig = toml::from_str(
            r#"
            [browser]
            headless = true

            [timing]
            wind_down_secs = 0
            "#,
        )
        .unwrap();
        assert!(cfg.browser.headless);
        assert_eq!(cfg.timing.wind_down_secs, 0);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.timing.scroll_settle_secs, 3);
        assert_eq!(cfg.site.certificates_url, "https://web.dio.me/certificates");
    }
}
