use crate::domain::constants::{MAX_REDIRECTS, TITLE_SCAN_LIMIT_BYTES, USER_AGENT};
use crate::domain::models::ValidationResult;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, Response};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Liveness check for a normalized url. Implementations never fail: every
/// error is reported as an unreachable result.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> ValidationResult;
}

/// HEAD first, GET if HEAD is refused, redirects followed, one deadline for
/// the whole sequence.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub async fn probe_with_timeout(&self, url: &str, timeout: Duration) -> ValidationResult {
        match tokio::time::timeout(timeout, self.attempt(url)).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                debug!(url, error = %err, "probe failed");
                ValidationResult::unreachable()
            }
            Err(_) => {
                debug!(url, timeout_ms = timeout.as_millis() as u64, "probe timed out");
                ValidationResult::unreachable()
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<ValidationResult, reqwest::Error> {
        let (response, has_body) = match self.client.head(url).send().await {
            Ok(r) if r.status().as_u16() < 400 => (r, false),
            Ok(r) => {
                debug!(url, status = r.status().as_u16(), "HEAD refused, retrying with GET");
                (self.client.get(url).send().await?, true)
            }
            Err(err) => {
                debug!(url, error = %err, "HEAD failed, retrying with GET");
                (self.client.get(url).send().await?, true)
            }
        };

        let status = response.status().as_u16();
        if status >= 400 {
            debug!(url, status, "probe got error status");
            return Ok(ValidationResult::unreachable());
        }

        let final_url = response.url().to_string();
        let page_title = if has_body && is_html(&response) {
            read_title(response).await
        } else {
            None
        };
        Ok(ValidationResult::reachable(final_url, page_title))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> ValidationResult {
        self.probe_with_timeout(url, self.timeout).await
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
}

async fn read_title(mut response: Response) -> Option<String> {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < TITLE_SCAN_LIMIT_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
        if contains_ignore_ascii_case(&buf, b"</title") {
            break;
        }
    }
    buf.truncate(TITLE_SCAN_LIMIT_BYTES);
    extract_title(&String::from_utf8_lossy(&buf))
}

fn contains_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("title pattern compiles")
    })
}

/// Text of the first `<title>` element, whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = title_pattern().captures(html)?.get(1)?.as_str();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let decoded = decode_basic_entities(&collapsed);
    (!decoded.is_empty()).then_some(decoded)
}

fn decode_basic_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::{contains_ignore_ascii_case, extract_title};

    #[test]
    fn title_is_extracted_and_collapsed() {
        let html = concat!(
            "<html><head><TITLE lang=\"pt\">\n",
            "  Vistos   nacionais &amp; AIMA\n",
            "</TITLE></head></html>",
        );
        assert_eq!(
            extract_title(html).as_deref(),
            Some("Vistos nacionais & AIMA")
        );
    }

    #[test]
    fn missing_or_empty_title_is_none() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
        assert_eq!(extract_title("<title>unterminated"), None);
    }

    #[test]
    fn close_tag_scan_ignores_case() {
        assert!(contains_ignore_ascii_case(b"<TITLE>x</TiTlE>", b"</title"));
        assert!(!contains_ignore_ascii_case(b"<title>x", b"</title"));
    }
}
