//! `Link` header pagination
//!
//! GitHub list endpoints advertise the following page in a `Link` response
//! header (`<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`).
//! [`PageCursor`] walks those links one page at a time and stops when no next
//! link is left, when the page budget is spent or when a link leaves the API
//! origin.
use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// Extract the `rel="next"` target from the `Link` headers of a response
pub fn next_link(headers: &HeaderMap) -> Option<Url> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Find the `rel="next"` target in one `Link` header value
fn parse_next_link(value: &str) -> Option<Url> {
    value.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

/// Position in a paginated listing
#[derive(Debug, Clone)]
pub struct PageCursor {
    /// Page to request next
    next: Option<Url>,

    /// Origin every page must stay on
    origin: url::Origin,

    /// Pages already consumed
    fetched: usize,

    /// Maximum number of pages to consume
    max_pages: usize,

    /// Why the cursor stopped before the listing was exhausted
    stop_reason: Option<String>,
}

impl PageCursor {
    /// Start a listing at `first`, consuming at most `max_pages` pages
    pub fn new(first: Url, max_pages: usize) -> Self {
        Self {
            origin: first.origin(),
            next: Some(first),
            fetched: 0,
            max_pages: max_pages.max(1),
            stop_reason: None,
        }
    }

    /// URL of the page to request, `None` once the listing is over
    pub fn next_url(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// Record a consumed page and the next link it advertised
    pub fn advance(&mut self, next: Option<Url>) {
        self.fetched += 1;
        self.next = match next {
            None => None,
            Some(_) if self.fetched >= self.max_pages => {
                self.stop_reason = Some(format!("stopped after {} pages", self.fetched));
                None
            }
            Some(url) if url.origin() != self.origin => {
                self.stop_reason = Some(format!("next page link leaves the API origin: {url}"));
                None
            }
            Some(url) => Some(url),
        };
    }

    /// Number of pages consumed so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Reason the listing was cut short, if it was
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use reqwest::header::HeaderValue;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn next_link_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/user/1/repos?page=1>; rel="prev", <https://api.github.com/user/1/repos?page=3>; rel="next", <https://api.github.com/user/1/repos?page=5>; rel="last""#,
            ),
        );
        assert_eq!(
            next_link(&headers),
            Some(url("https://api.github.com/user/1/repos?page=3"))
        );
    }

    #[test]
    fn no_next_link() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_link(&headers), None);
        headers.insert(
            LINK,
            HeaderValue::from_static(r#"<https://api.github.com/x?page=1>; rel="first""#),
        );
        assert_eq!(next_link(&headers), None);
    }

    #[test]
    fn unquoted_and_multi_valued_rel() {
        assert_eq!(
            parse_next_link("<https://api.github.com/x?page=2>; rel=next"),
            Some(url("https://api.github.com/x?page=2"))
        );
        assert_eq!(
            parse_next_link(r#"<https://api.github.com/x?page=2>; rel="next last""#),
            Some(url("https://api.github.com/x?page=2"))
        );
        assert_eq!(parse_next_link(r#"https://api.github.com/x; rel="next""#), None);
    }

    #[test]
    fn cursor_walks_until_no_next() {
        let mut cursor = PageCursor::new(url("https://api.github.com/x"), 10);
        assert_eq!(cursor.next_url(), Some(&url("https://api.github.com/x")));
        cursor.advance(Some(url("https://api.github.com/x?page=2")));
        assert_eq!(cursor.next_url(), Some(&url("https://api.github.com/x?page=2")));
        cursor.advance(None);
        assert_eq!(cursor.next_url(), None);
        assert_eq!(cursor.pages_fetched(), 2);
        assert_eq!(cursor.stop_reason(), None);
    }

    #[test]
    fn cursor_respects_page_budget() {
        let mut cursor = PageCursor::new(url("https://api.github.com/x"), 2);
        cursor.advance(Some(url("https://api.github.com/x?page=2")));
        cursor.advance(Some(url("https://api.github.com/x?page=3")));
        assert_eq!(cursor.next_url(), None);
        assert_eq!(cursor.stop_reason(), Some("stopped after 2 pages"));
    }

    #[test]
    fn cursor_refuses_foreign_origin() {
        let mut cursor = PageCursor::new(url("https://api.github.com/x"), 10);
        cursor.advance(Some(url("https://evil.example.com/x?page=2")));
        assert_eq!(cursor.next_url(), None);
        assert!(cursor.stop_reason().is_some());
    }
}
