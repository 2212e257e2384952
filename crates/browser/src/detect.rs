//! Browser detection and install guidance.

use std::path::PathBuf;

/// Known Chromium-based executable names to search for. All of these speak
/// CDP (Chrome DevTools Protocol).
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge-stable",
    "brave-browser",
];

/// macOS app bundle paths for Chromium-based browsers.
#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Windows installation paths for Chromium-based browsers.
#[cfg(target_os = "windows")]
const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Result of browser detection.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Path to the browser executable, if one was found.
    pub path: Option<PathBuf>,
    /// Platform-specific install instructions (empty when found).
    pub install_hint: String,
}

/// Detect a Chromium-based browser on the system.
///
/// Checks (in order): custom path from config, the `CHROME` environment
/// variable, platform-specific install paths, then known executable names in
/// `PATH`. Platform paths come before `PATH` because `PATH` can contain
/// broken wrapper scripts.
pub fn detect_browser(custom_path: Option<&str>) -> Detection {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Detection {
                path: Some(p),
                install_hint: String::new(),
            };
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Detection {
                path: Some(p),
                install_hint: String::new(),
            };
        }
    }

    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Detection {
                path: Some(p),
                install_hint: String::new(),
            };
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Detection {
                path: Some(p),
                install_hint: String::new(),
            };
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return Detection {
                path: Some(path),
                install_hint: String::new(),
            };
        }
    }

    Detection {
        path: None,
        install_hint: install_instructions(),
    }
}

/// Platform-specific install instructions.
pub fn install_instructions() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Arch:           sudo pacman -S chromium"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Any Chromium-based browser works (Chrome, Chromium, Edge, Brave).\n\n\
         Or set the path in certgrab.toml:\n  \
         [browser]\n  \
         chrome_path = \"/path/to/browser\"\n\n\
         Or set the CHROME environment variable."
    )
}
