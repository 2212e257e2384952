//! Browser launch configuration.

use {certgrab_config::schema::DEFAULT_USER_AGENT, serde::{Deserialize, Serialize}};

/// Browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode. Defaults to false: the window must be
    /// visible so the operator can complete the manual login.
    pub headless: bool,
    /// Viewport width.
    pub viewport_width: u32,
    /// Viewport height.
    pub viewport_height: u32,
    /// User agent string.
    pub user_agent: String,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
    /// Navigation/request timeout in milliseconds.
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
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

impl From<&certgrab_config::schema::BrowserSection> for BrowserConfig {
    fn from(cfg: &certgrab_config::schema::BrowserSection) -> Self {
        Self {
            chrome_path: cfg.chrome_path.clone(),
            headless: cfg.headless,
            viewport_width: cfg.viewport_width,
            viewport_height: cfg.viewport_height,
            user_agent: cfg.user_agent.clone(),
            chrome_args: cfg.chrome_args.clone(),
            navigation_timeout_ms: cfg.navigation_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_headful() {
        let config = BrowserConfig::default();
        assert!(!config.headless);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.viewport_height, 1080);
        assert!(config.user_agent.contains("Chrome/120"));
    }

    #[test]
    fn config_from_schema_section() {
        let section = certgrab_config::schema::BrowserSection {
            headless: true,
            chrome_path: Some("/usr/bin/chromium".into()),
            ..Default::default()
        };
        let config = BrowserConfig::from(&section);
        assert!(config.headless);
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.navigation_timeout_ms, 30_000);
    }
}
