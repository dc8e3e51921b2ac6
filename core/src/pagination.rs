//! Paged collections.
//!
//! List operations return at most `limit` items plus a `next` link whose
//! `start` query parameter fetches the following page. The last page has no
//! `next` link.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub href: String,
}

impl PageLink {
    /// The `start` token carried by this link, if any.
    pub fn start(&self) -> Option<String> {
        let url = Url::parse(&self.href).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == "start")
            .map(|(_, v)| v.into_owned())
    }
}

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub first: Option<PageLink>,
    pub next: Option<PageLink>,
    pub limit: Option<u32>,
    pub total_count: Option<u32>,
}

impl<T> Collection<T> {
    pub fn next_start(&self) -> Option<String> {
        self.next.as_ref().and_then(PageLink::start)
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// The paging fields shared by every collection body.
#[derive(Deserialize)]
pub(crate) struct PageFields {
    #[serde(default)]
    pub first: Option<PageLink>,
    #[serde(default)]
    pub next: Option<PageLink>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(next: Option<&str>) -> Collection<()> {
        Collection {
            items: Vec::new(),
            first: None,
            next: next.map(|href| PageLink {
                href: href.to_string(),
            }),
            limit: Some(2),
            total_count: None,
        }
    }

    #[test]
    fn next_start_reads_query_parameter() {
        let page = page(Some(
            "https://us-south.iaas.cloud.ibm.com/v1/vpcs?limit=2&start=r006-abc&version=2020-06-02",
        ));
        assert_eq!(page.next_start().as_deref(), Some("r006-abc"));
        assert!(!page.is_last());
    }

    #[test]
    fn next_start_decodes_percent_encoding() {
        let page = page(Some("http://localhost/v1/keys?start=a%2Fb"));
        assert_eq!(page.next_start().as_deref(), Some("a/b"));
    }

    #[test]
    fn missing_next_is_last_page() {
        let page = page(None);
        assert!(page.is_last());
        assert!(page.next_start().is_none());
    }

    #[test]
    fn relative_href_has_no_start() {
        assert!(page(Some("/v1/vpcs?start=x")).next_start().is_none());
    }
}
