//! A single owned browser session over CDP.

use std::{path::Path, time::Instant};

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page,
        cdp::browser_protocol::browser::{SetDownloadBehaviorBehavior, SetDownloadBehaviorParams},
    },
    futures::StreamExt,
    serde::de::DeserializeOwned,
    tokio::time::{Duration, sleep},
    tracing::{debug, info, warn},
};

use crate::{error::BrowserError, types::BrowserConfig};

/// One browser process and one page, owned for the lifetime of a run.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    /// Launch a browser on the host and open a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let detection = crate::detect::detect_browser(config.chrome_path.as_deref());
        let Some(chrome) = detection.path else {
            return Err(BrowserError::LaunchFailed(format!(
                "Chrome/Chromium not found.\n{}",
                detection.install_hint
            )));
        };

        info!(
            chrome = %chrome.display(),
            viewport_width = config.viewport_width,
            viewport_height = config.viewport_height,
            headless = config.headless,
            "configuring browser"
        );

        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless by default; with_head() shows the window.
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .chrome_executable(&chrome)
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(Duration::from_millis(config.navigation_timeout_ms))
            .arg(format!("--user-agent={}", config.user_agent))
            .arg(format!(
                "--window-size={},{}",
                config.viewport_width, config.viewport_height
            ))
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(|e| {
            BrowserError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drive CDP events until the connection closes.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
            debug!("browser event handler exited (connection closed)");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("browser session launched");

        Ok(Self { browser, page })
    }

    /// Point downloads at `dir` so files save silently instead of opening
    /// inline or prompting.
    pub async fn allow_downloads_to(&self, dir: &Path) -> Result<(), BrowserError> {
        let cmd = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(dir.to_string_lossy().into_owned())
            .build()
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;

        self.page
            .execute(cmd)
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;

        info!(dir = %dir.display(), "download behavior set");
        Ok(())
    }

    /// Navigate to a URL and wait for the navigation to settle.
    pub async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        validate_url(url)?;

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

        // Wait for network idle; a timeout here is not fatal.
        if let Err(e) = self.page.wait_for_navigation().await {
            warn!(url, error = %e, "navigation wait ended early");
        }

        info!(url = self.current_url().await, "navigated");
        Ok(())
    }

    /// The current page URL, or empty if unavailable.
    pub async fn current_url(&self) -> String {
        self.page.url().await.ok().flatten().unwrap_or_default()
    }

    /// Evaluate JavaScript in the page and deserialize the result.
    pub async fn eval<T: DeserializeOwned>(&self, js: &str) -> Result<T, BrowserError> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::JsEval(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::JsEval(e.to_string()))
    }

    /// Evaluate JavaScript for its side effect, discarding the result.
    pub async fn run(&self, js: &str) -> Result<(), BrowserError> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::JsEval(e.to_string()))?;
        Ok(())
    }

    /// Poll an injected boolean predicate every 100 ms until it holds or the
    /// timeout elapses.
    pub async fn wait_for(&self, predicate_js: &str, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        let interval = Duration::from_millis(100);

        while Instant::now() < deadline {
            let found: bool = self
                .page
                .evaluate(predicate_js)
                .await
                .map_err(|e| BrowserError::JsEval(e.to_string()))?
                .into_value()
                .unwrap_or(false);

            if found {
                debug!("wait condition satisfied");
                return Ok(());
            }

            sleep(interval).await;
        }

        Err(BrowserError::Timeout(format!(
            "condition not met after {}ms",
            timeout.as_millis()
        )))
    }

    /// Close the browser process. Best effort: the process is also reaped on
    /// drop, but an explicit close keeps shutdown deterministic.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        let _ = self.browser.wait().await;
        info!("browser session closed");
    }
}

/// Validate a URL before attempting navigation: parseable, http/https only.
fn validate_url(url: &str) -> Result<(), BrowserError> {
    if url.is_empty() {
        return Err(BrowserError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| BrowserError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BrowserError::InvalidUrl(format!(
            "unsupported URL scheme '{scheme}', only http/https allowed"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("https://web.dio.me/sign-in").is_ok());
        assert!(validate_url("http://localhost:8080/path").is_ok());
    }

    #[test]
    fn validate_url_rejects_empty() {
        assert!(validate_url("").is_err());
    }

    #[test]
    fn validate_url_rejects_other_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn validate_url_rejects_malformed() {
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("://missing.scheme").is_err());
    }
}
