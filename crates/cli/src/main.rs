//! certgrab: download every certificate from web.dio.me through a real,
//! visible browser. The operator logs in manually; everything after that is
//! automated.

use std::{path::PathBuf, process::ExitCode};

use {
    certgrab_browser::{BrowserConfig, BrowserSession},
    certgrab_config::CertgrabConfig,
    certgrab_harvest::{BatchReport, DownloadPlan, discover, load_full_listing, run_batch, watch},
    clap::Parser,
    tokio::time::Duration,
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "certgrab", about = "certgrab — download your DIO certificates")]
struct Cli {
    /// Download directory (overrides config value).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Sign-in page URL (overrides config value).
    #[arg(long)]
    sign_in_url: Option<String>,

    /// Certificates page URL (overrides config value).
    #[arg(long)]
    certificates_url: Option<String>,

    /// Run the browser headless. Only useful when the site session is already
    /// authenticated; the normal flow needs a visible window for login.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn apply_overrides(cfg: &mut CertgrabConfig, cli: &Cli) {
    if let Some(dir) = &cli.dir {
        cfg.downloads.dir = dir.clone();
    }
    if let Some(url) = &cli.sign_in_url {
        cfg.site.sign_in_url = url.clone();
    }
    if let Some(url) = &cli.certificates_url {
        cfg.site.certificates_url = url.clone();
    }
    if cli.headless {
        cfg.browser.headless = true;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_telemetry(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("\n❌ Unexpected error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    eprintln!("🚀 === certgrab — DIO certificate downloader ===");

    let mut cfg = certgrab_config::discover_and_load();
    apply_overrides(&mut cfg, &cli);

    if watch::ensure_dir(&cfg.downloads.dir)? {
        eprintln!("📁 Created download directory '{}'.", cfg.downloads.dir.display());
    }
    info!(dir = %cfg.downloads.dir.display(), "download directory ready");

    let session = BrowserSession::launch(&BrowserConfig::from(&cfg.browser)).await?;

    let result = drive(&session, &cfg).await;

    // Mandatory wind-down before releasing the session, on success and on
    // failure alike, so the browser process is never leaked.
    eprintln!("\nThe browser will close in {} seconds...", cfg.timing.wind_down_secs);
    tokio::time::sleep(Duration::from_secs(cfg.timing.wind_down_secs)).await;
    session.close().await;

    let report = result?;
    eprintln!(
        "\n🎉 Done: {} downloaded, {} skipped, {} failed (of {}).",
        report.downloaded,
        report.skipped,
        report.failed,
        report.total()
    );
    Ok(())
}

/// Everything between launch and wind-down. Errors here are listing-level or
/// fatal; per-certificate failures stay inside the batch report.
async fn drive(session: &BrowserSession, cfg: &CertgrabConfig) -> anyhow::Result<BatchReport> {
    session.allow_downloads_to(&cfg.downloads.dir).await?;

    session.goto(&cfg.site.sign_in_url).await?;
    wait_for_login_confirmation().await?;
    eprintln!("\nLogin confirmed. Continuing...");

    eprintln!("\nNavigating to the certificates page...");
    session.goto(&cfg.site.certificates_url).await?;

    eprintln!("Loading every certificate on the page (scroll)...");
    load_full_listing(session, Duration::from_secs(cfg.timing.scroll_settle_secs)).await?;

    eprintln!("Waiting for the certificate listing...");
    let certificates = discover(
        session,
        Duration::from_secs(cfg.timing.listing_timeout_secs),
    )
    .await?;
    eprintln!("✅ Found {} certificates. Starting downloads...", certificates.len());

    let plan = DownloadPlan {
        dir: &cfg.downloads.dir,
        detect_timeout: Duration::from_secs(cfg.downloads.detect_timeout_secs),
        in_progress_suffixes: &cfg.downloads.in_progress_suffixes,
    };

    Ok(run_batch(session, &certificates, &plan).await)
}

/// Block until the operator confirms login in the visible window.
///
/// Deliberately has no timeout and no credential handling: certgrab never
/// sees or stores credentials, the human does the login.
async fn wait_for_login_confirmation() -> anyhow::Result<()> {
    eprintln!("\n--- ACTION REQUIRED ---");
    eprintln!("A browser window has opened. Complete the login manually.");
    eprintln!("When you are logged in, return here and press Enter to continue...");

    tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).map(|_| ())
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("certgrab").chain(args.iter().copied()))
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut cfg = CertgrabConfig::default();
        let cli = parse(&[
            "--dir",
            "/tmp/meus-certificados",
            "--sign-in-url",
            "https://example.com/login",
            "--headless",
        ]);

        apply_overrides(&mut cfg, &cli);

        assert_eq!(cfg.downloads.dir, PathBuf::from("/tmp/meus-certificados"));
        assert_eq!(cfg.site.sign_in_url, "https://example.com/login");
        assert!(cfg.browser.headless);
        // Untouched values stay at their defaults.
        assert_eq!(cfg.site.certificates_url, "https://web.dio.me/certificates");
    }

    #[test]
    fn no_flags_leaves_config_untouched() {
        let mut cfg = CertgrabConfig::default();
        let before = cfg.site.sign_in_url.clone();

        apply_overrides(&mut cfg, &parse(&[]));

        assert_eq!(cfg.site.sign_in_url, before);
        assert!(!cfg.browser.headless);
    }
}
