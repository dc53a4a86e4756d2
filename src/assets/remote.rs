#![cfg_attr(not(feature = "remote-fonts"), allow(dead_code))]

use std::time::Duration;

#[cfg(feature = "remote-fonts")]
use crate::foundation::error::{OgError, OgResult};

/// The CSS2 API serves woff2 to unknown agents; a desktop browser agent gets TrueType URLs.
pub(crate) const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Timeout and retry policy for startup font downloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoteFontOpts {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first failed attempt.
    pub retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub backoff: Duration,
}

impl Default for RemoteFontOpts {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Stylesheet URL for one family/weight on the Google Fonts CSS2 API.
pub(crate) fn google_css_url(family: &str, weight: u16) -> String {
    let family = family.trim().replace(' ', "+");
    format!("https://fonts.googleapis.com/css2?family={family}:wght@{weight}&display=swap")
}

/// First `src: url(...)` in a font-face stylesheet.
pub(crate) fn extract_font_url(css: &str) -> Option<&str> {
    let start = css.find("src: url(")? + "src: url(".len();
    let rest = &css[start..];
    let end = rest.find(')')?;
    let url = rest[..end].trim().trim_matches(|c| c == '\'' || c == '"');
    if url.is_empty() { None } else { Some(url) }
}

/// Download one face from Google Fonts, retrying transient failures.
#[cfg(feature = "remote-fonts")]
#[tracing::instrument(skip(opts))]
pub fn fetch_google_font(family: &str, weight: u16, opts: &RemoteFontOpts) -> OgResult<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(opts.timeout)
        .user_agent(DESKTOP_USER_AGENT)
        .build()
        .map_err(|e| OgError::asset_load(format!("http client: {e}")))?;

    let mut attempt = 0u32;
    loop {
        match fetch_once(&client, family, weight) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < opts.retries => {
                let delay = opts.backoff.saturating_mul(1u32 << attempt.min(16));
                tracing::warn!(attempt, ?delay, error = %e, "font download failed; retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                return Err(OgError::asset_load(format!(
                    "fetch font '{family}' weight {weight}: {e}"
                )));
            }
        }
    }
}

#[cfg(feature = "remote-fonts")]
fn fetch_once(
    client: &reqwest::blocking::Client,
    family: &str,
    weight: u16,
) -> Result<Vec<u8>, String> {
    let css = client
        .get(google_css_url(family, weight))
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(|e| format!("stylesheet: {e}"))?;
    let url = extract_font_url(&css).ok_or_else(|| "no font url in stylesheet".to_string())?;
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("font file: {e}"))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/remote.rs"]
mod tests;
