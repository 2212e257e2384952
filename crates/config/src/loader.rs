//! Config file discovery and parsing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::CertgrabConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["certgrab.toml", "certgrab.json"];

/// Load config from the given path (format decided by extension).
pub fn load_config(path: &Path) -> anyhow::Result<CertgrabConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" => Ok(toml::from_str(&raw)?),
        "json" => Ok(serde_json::from_str(&raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./certgrab.{toml,json}` (project-local)
/// 2. `~/.config/certgrab/certgrab.{toml,json}` (user-global)
///
/// Returns `CertgrabConfig::default()` if no config file is found; a file
/// that fails to parse is reported and ignored.
pub fn discover_and_load() -> CertgrabConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    CertgrabConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "certgrab") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certgrab.toml");
        std::fs::write(
            &path,
            r#"
            [site]
            sign_in_url = "https://example.com/login"

            [downloads]
            detect_timeout_secs = 5
            "#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.site.sign_in_url, "https://example.com/login");
        assert_eq!(cfg.downloads.detect_timeout_secs, 5);
        // Defaults fill the rest.
        assert_eq!(cfg.timing.listing_timeout_secs, 40);
    }

    #[test]
    fn load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certgrab.json");
        std::fs::write(&path, r#"{"browser": {"headless": true}}"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert!(cfg.browser.headless);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certgrab.ini");
        std::fs::write(&path, "").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/certgrab.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
