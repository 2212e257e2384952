//! Per-certificate download loop.
//!
//! Best-effort batch semantics: each certificate is attempted once, a failed
//! item is logged and the loop moves on. Re-running is safe because an
//! already-downloaded certificate is recognized by its destination file and
//! skipped, never overwritten.

use std::path::{Path, PathBuf};

use {
    certgrab_browser::BrowserSession,
    tokio::time::Duration,
    tracing::{info, warn},
};

use crate::{
    error::ItemError,
    listing::Certificate,
    sanitize::sanitize_title,
    watch,
};

/// Where and how downloads are detected.
#[derive(Debug, Clone)]
pub struct DownloadPlan<'a> {
    /// Directory the browser saves into; also where finished files land.
    pub dir: &'a Path,
    /// Per-item window for the file to appear on disk.
    pub detect_timeout: Duration,
    /// Suffixes marking a download still in progress.
    pub in_progress_suffixes: &'a [String],
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

/// Destination path for a certificate title: sanitized stem plus `.pdf`.
pub fn destination(dir: &Path, raw_title: &str) -> PathBuf {
    dir.join(format!("{}.pdf", sanitize_title(raw_title)))
}

enum ItemOutcome {
    Downloaded(PathBuf),
    AlreadyPresent,
}

/// Pre-browser decision for one certificate: skip because the destination
/// already exists, or proceed and save to it.
#[derive(Debug, PartialEq, Eq)]
enum ItemDecision {
    Skip,
    Fetch(PathBuf),
}

fn decide(dir: &Path, raw_title: &str) -> ItemDecision {
    let dest = destination(dir, raw_title);
    if dest.exists() {
        ItemDecision::Skip
    } else {
        ItemDecision::Fetch(dest)
    }
}

/// Download every certificate in document order. A single failed item never
/// aborts the batch.
pub async fn run_batch(
    session: &BrowserSession,
    certificates: &[Certificate],
    plan: &DownloadPlan<'_>,
) -> BatchReport {
    let total = certificates.len();
    let mut report = BatchReport::default();

    for (i, cert) in certificates.iter().enumerate() {
        let title = sanitize_title(&cert.title);
        eprintln!("\n--- Certificate {}/{} ---", i + 1, total);
        eprintln!("  > Title: {title}");

        match download_one(session, cert, plan).await {
            Ok(ItemOutcome::Downloaded(path)) => {
                eprintln!("  > ✅ Saved as '{}'", path.display());
                info!(title, path = %path.display(), "certificate downloaded");
                report.downloaded += 1;
            },
            Ok(ItemOutcome::AlreadyPresent) => {
                eprintln!("  > 🟡 Already downloaded. Skipping.");
                info!(title, "certificate already present, skipped");
                report.skipped += 1;
            },
            Err(ItemError::DetectionTimeout(secs)) => {
                eprintln!("  > ❌ Download not detected within {secs}s.");
                warn!(title, secs, "download not detected in time");
                report.failed += 1;
            },
            Err(e) => {
                eprintln!("  > 💥 Failed: {e}");
                warn!(title, error = %e, "certificate failed");
                report.failed += 1;
            },
        }
    }

    report
}

async fn download_one(
    session: &BrowserSession,
    cert: &Certificate,
    plan: &DownloadPlan<'_>,
) -> Result<ItemOutcome, ItemError> {
    let dest = match decide(plan.dir, &cert.title) {
        ItemDecision::Skip => return Ok(ItemOutcome::AlreadyPresent),
        ItemDecision::Fetch(dest) => dest,
    };

    let before = watch::snapshot(plan.dir)?;

    trigger_download(session, cert).await?;
    eprintln!("  > ⏳ Clicked download, waiting for the file...");

    let Some(new_file) = watch::wait_for_new_file(
        plan.dir,
        &before,
        plan.detect_timeout,
        plan.in_progress_suffixes,
    )
    .await?
    else {
        return Err(ItemError::DetectionTimeout(plan.detect_timeout.as_secs()));
    };

    std::fs::rename(&new_file, &dest)?;
    Ok(ItemOutcome::Downloaded(dest))
}

/// Dispatch the click from page context. A synthetic mouse click can land on
/// an overlay; calling `el.click()` on the tagged button sidesteps that.
async fn trigger_download(
    session: &BrowserSession,
    cert: &Certificate,
) -> Result<(), ItemError> {
    let js = format!(
        r#"(() => {{
            const el = document.querySelector('{}');
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        cert.button_selector()
    );

    let clicked: bool = session.eval(&js).await?;
    if !clicked {
        return Err(ItemError::ButtonMissing);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_is_sanitized_pdf() {
        let dest = destination(Path::new("/tmp/certs"), "  Curso: Rust?  ");
        assert_eq!(dest, Path::new("/tmp/certs/Curso Rust.pdf"));
    }

    #[test]
    fn destination_falls_back_for_blank_title() {
        let dest = destination(Path::new("/tmp/certs"), "   ");
        assert_eq!(dest, Path::new("/tmp/certs/certificado_sem_nome.pdf"));
    }

    #[test]
    fn existing_destination_means_skip() {
        // The skip decision is exactly "destination exists"; a present file
        // must never be overwritten on re-run.
        let dir = tempfile::tempdir().unwrap();
        let dest = destination(dir.path(), "Curso Rust");
        std::fs::write(&dest, b"original").unwrap();

        assert_eq!(decide(dir.path(), "Curso Rust"), ItemDecision::Skip);
        assert_eq!(std::fs::read(&dest).unwrap(), b"original");
    }

    #[test]
    fn missing_destination_means_fetch() {
        let dir = tempfile::tempdir().unwrap();

        let decision = decide(dir.path(), "  Curso: Rust?  ");
        assert_eq!(
            decision,
            ItemDecision::Fetch(dir.path().join("Curso Rust.pdf"))
        );
    }

    #[test]
    fn skip_matches_on_sanitized_title() {
        // A re-run sees the same raw title from the page; the decision must
        // hit the sanitized destination written by the previous run.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Curso Rust.pdf"), b"x").unwrap();

        assert_eq!(decide(dir.path(), "  Curso: Rust?  "), ItemDecision::Skip);
    }

    #[test]
    fn report_totals() {
        let report = BatchReport {
            downloaded: 2,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(report.total(), 4);
    }
}
