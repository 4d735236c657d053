use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Generic page request, as supplied by tool callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    /// GitLab query parameters; absent values are omitted, never defaulted.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(p) = self.per_page {
            out.push(("per_page".to_string(), p.to_string()));
        }
        if let Some(p) = self.page {
            out.push(("page".to_string(), p.to_string()));
        }
        out
    }

    /// Apply the default page-size policy: 20 when absent, clamped to 1..=100.
    pub fn with_defaults(self) -> Self {
        Self {
            page: self.page,
            per_page: Some(clamp_per_page(self.per_page)),
        }
    }

    /// Pages are 1-based upstream; a zero page is refused rather than
    /// forwarded.
    pub fn validate(&self) -> Result<(), String> {
        match self.page {
            Some(0) => Err("page must be >= 1".to_string()),
            _ => Ok(()),
        }
    }
}

pub fn clamp_per_page(per_page: Option<u32>) -> u32 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// Pagination metadata GitLab reports in response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl PaginationMeta {
    /// Every header is parsed independently; missing, empty or malformed
    /// values degrade to `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            total: header_num(headers, "x-total"),
            total_pages: header_num(headers, "x-total-pages"),
            page: header_num(headers, "x-page"),
            per_page: header_num(headers, "x-per-page"),
            next_page: header_num(headers, "x-next-page"),
            prev_page: header_num(headers, "x-prev-page"),
        }
    }
}

fn header_num<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<N>().ok())
}

/// Uniform envelope around every list-returning operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    pub fn from_headers(items: Vec<T>, headers: &HeaderMap) -> Self {
        Self::from_meta(items, PaginationMeta::from_headers(headers))
    }

    pub fn from_meta(items: Vec<T>, meta: PaginationMeta) -> Self {
        Self {
            count: items.len(),
            items,
            total: meta.total,
            page: meta.page,
            next_page: meta.next_page,
            total_pages: meta.total_pages,
            has_more: meta.next_page.is_some(),
        }
    }

    /// Envelope for results that did not come with pagination headers.
    pub fn from_items(items: Vec<T>, has_more: bool) -> Self {
        Self {
            count: items.len(),
            items,
            total: None,
            page: None,
            next_page: None,
            total_pages: None,
            has_more,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        h
    }

    #[test]
    fn per_page_policy() {
        assert_eq!(clamp_per_page(None), 20);
        assert_eq!(clamp_per_page(Some(50)), 50);
        assert_eq!(clamp_per_page(Some(100)), 100);
        assert_eq!(clamp_per_page(Some(250)), 100);
        assert_eq!(clamp_per_page(Some(0)), 1);
        let p = PageParams::new(Some(3), Some(500)).with_defaults();
        assert_eq!(p, PageParams::new(Some(3), Some(100)));
    }

    #[test]
    fn query_pairs_omit_absent_values() {
        assert!(PageParams::default().query_pairs().is_empty());
        let pairs = PageParams::new(Some(2), None).query_pairs();
        assert_eq!(pairs, vec![("page".to_string(), "2".to_string())]);
        // No clamping on the outbound mapping itself.
        let pairs = PageParams::new(None, Some(300)).query_pairs();
        assert_eq!(pairs, vec![("per_page".to_string(), "300".to_string())]);
    }

    #[test]
    fn zero_page_is_refused() {
        assert!(PageParams::new(Some(0), None).validate().is_err());
        assert!(PageParams::new(Some(1), None).validate().is_ok());
        assert!(PageParams::default().validate().is_ok());
    }

    #[test]
    fn headers_decode_into_envelope() {
        let h = headers(&[
            ("X-Total", "42"),
            ("X-Total-Pages", "3"),
            ("X-Next-Page", "2"),
            ("X-Page", "1"),
        ]);
        let p = Paginated::from_headers(vec![1, 2, 3], &h);
        assert_eq!(p.total, Some(42));
        assert_eq!(p.total_pages, Some(3));
        assert_eq!(p.next_page, Some(2));
        assert_eq!(p.page, Some(1));
        assert!(p.has_more);
        assert_eq!(p.count, 3);
    }

    #[test]
    fn malformed_headers_degrade_to_none() {
        let h = headers(&[
            ("X-Total", "lots"),
            ("X-Total-Pages", ""),
            ("X-Page", "-1"),
            ("X-Next-Page", ""),
        ]);
        let meta = PaginationMeta::from_headers(&h);
        assert_eq!(meta, PaginationMeta::default());
        let p = Paginated::from_meta(vec!["a"], meta);
        assert!(!p.has_more);
        assert_eq!(p.count, 1);
    }

    #[test]
    fn empty_list_without_headers_is_well_formed() {
        let p: Paginated<u8> = Paginated::from_headers(Vec::new(), &HeaderMap::new());
        assert_eq!(p.count, 0);
        assert_eq!(p.total, None);
        assert_eq!(p.page, None);
        assert_eq!(p.next_page, None);
        assert_eq!(p.total_pages, None);
        assert!(!p.has_more);
    }

    #[test]
    fn synthetic_envelope_uses_supplied_flag() {
        let p = Paginated::from_items(vec![1], true);
        assert!(p.has_more);
        assert_eq!(p.next_page, None);
    }
}
