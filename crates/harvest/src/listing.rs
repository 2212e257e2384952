//! Certificate listing discovery.
//!
//! The certificates page lazy-loads items as it scrolls, so discovery is two
//! phases: scroll until the page height stops growing, then one injected-JS
//! pass over the DOM. A certificate is any `li` that carries both an `h5`
//! title and a download button; each matching button is tagged with a
//! `data-certgrab-ref` attribute so the download step can address it without
//! holding element handles across the batch.

use {
    certgrab_browser::{BrowserError, BrowserSession},
    serde::Deserialize,
    tokio::time::Duration,
    tracing::{debug, info},
};

use crate::error::HarvestError;

/// Button label that marks a download trigger on the certificates page.
pub const DOWNLOAD_BUTTON_LABEL: &str = "BAIXAR CERTIFICADO";

/// One discovered certificate, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Value of the `data-certgrab-ref` attribute on the download button.
    pub ref_: u32,
    /// Raw title text, not yet sanitized.
    pub title: String,
}

impl Certificate {
    /// Selector for this certificate's tagged download button.
    pub fn button_selector(&self) -> String {
        format!("[data-certgrab-ref=\"{}\"]", self.ref_)
    }
}

#[derive(Debug, Deserialize)]
struct TaggedItem {
    #[serde(rename = "ref")]
    ref_: u32,
    title: String,
}

const PAGE_HEIGHT_JS: &str = "document.body.scrollHeight";
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight); true";

/// True once at least one certificate item has rendered.
fn listing_present_js() -> String {
    format!(
        r#"(() => {{
            for (const li of document.querySelectorAll('li')) {{
                if (!li.querySelector('h5')) continue;
                for (const b of li.querySelectorAll('button')) {{
                    if ((b.textContent || '').includes('{DOWNLOAD_BUTTON_LABEL}')) return true;
                }}
            }}
            return false;
        }})()"#
    )
}

/// Tag every certificate item's download button and report `{ref, title}`
/// pairs in document order.
fn tag_listing_js() -> String {
    format!(
        r#"(() => {{
            const out = [];
            let n = 0;
            for (const li of document.querySelectorAll('li')) {{
                const h5 = li.querySelector('h5');
                if (!h5) continue;
                const button = Array.from(li.querySelectorAll('button'))
                    .find((b) => (b.textContent || '').includes('{DOWNLOAD_BUTTON_LABEL}'));
                if (!button) continue;
                n += 1;
                button.setAttribute('data-certgrab-ref', String(n));
                out.push({{ ref: n, title: h5.textContent || '' }});
            }}
            return out;
        }})()"#
    )
}

/// Scroll to the bottom until the page height stabilizes (two consecutive
/// equal readings), waiting `settle` after each scroll for lazy content to
/// render.
pub async fn load_full_listing(
    session: &BrowserSession,
    settle: Duration,
) -> Result<(), HarvestError> {
    let mut last_height: i64 = session.eval(PAGE_HEIGHT_JS).await?;

    loop {
        session.run(SCROLL_TO_BOTTOM_JS).await?;
        tokio::time::sleep(settle).await;

        let new_height: i64 = session.eval(PAGE_HEIGHT_JS).await?;
        debug!(last_height, new_height, "scrolled to bottom");
        if new_height == last_height {
            break;
        }
        last_height = new_height;
    }

    info!(height = last_height, "page height stable, listing fully loaded");
    Ok(())
}

/// Only a timeout waiting for the listing is a listing timeout; a scripting
/// or connection failure keeps its own identity in operator output.
fn classify_wait_error(err: BrowserError) -> HarvestError {
    match err {
        BrowserError::Timeout(msg) => HarvestError::ListingTimeout(msg),
        other => HarvestError::Browser(other),
    }
}

/// Wait (bounded) for the listing to render, then tag and collect every
/// certificate. Zero certificates is a listing-level failure.
pub async fn discover(
    session: &BrowserSession,
    timeout: Duration,
) -> Result<Vec<Certificate>, HarvestError> {
    session
        .wait_for(&listing_present_js(), timeout)
        .await
        .map_err(classify_wait_error)?;

    let items: Vec<TaggedItem> = session.eval(&tag_listing_js()).await?;

    if items.is_empty() {
        return Err(HarvestError::NoCertificates);
    }

    info!(count = items.len(), "certificates discovered");

    Ok(items
        .into_iter()
        .map(|item| Certificate {
            ref_: item.ref_,
            title: item.title,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_selector_targets_tagged_ref() {
        let cert = Certificate {
            ref_: 7,
            title: "x".into(),
        };
        assert_eq!(cert.button_selector(), r#"[data-certgrab-ref="7"]"#);
    }

    #[test]
    fn injected_js_carries_button_label() {
        assert!(listing_present_js().contains(DOWNLOAD_BUTTON_LABEL));
        assert!(tag_listing_js().contains(DOWNLOAD_BUTTON_LABEL));
        assert!(tag_listing_js().contains("data-certgrab-ref"));
    }

    #[test]
    fn wait_timeout_becomes_listing_timeout() {
        let err = classify_wait_error(BrowserError::Timeout("condition not met".into()));
        assert!(matches!(err, HarvestError::ListingTimeout(_)));
    }

    #[test]
    fn wait_js_failure_keeps_its_identity() {
        let err = classify_wait_error(BrowserError::JsEval("SyntaxError".into()));
        assert!(matches!(
            err,
            HarvestError::Browser(BrowserError::JsEval(_))
        ));
    }

    #[test]
    fn tagged_items_deserialize_in_order() {
        let raw = r#"[{"ref": 1, "title": "A"}, {"ref": 2, "title": "B"}]"#;
        let items: Vec<TaggedItem> = serde_json::from_str(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ref_, 1);
        assert_eq!(items[1].title, "B");
    }
}
