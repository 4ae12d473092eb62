//! Listing-page scraper for series codes.
//!
//! FRED search/release listing pages link each series as `.../series/<CODE>`
//! and expose pagination through a "last page" anchor whose href ends in
//! `pageID=<n>`. The harvester fetches every page and collects `(code, name)`
//! pairs from the series links.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use crate::domain::IndicatorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request for '{url}' failed: {reason}")]
    Request { url: String, reason: String },

    #[error("request for '{url}' returned status {status}")]
    Status { url: String, status: u16 },
}

/// Fetches one HTML page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Blocking HTTP page fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Request {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let resp = self.client.get(url).send().map_err(|e| ScrapeError::Request {
            url: url.to_string(),
            reason: e.without_url().to_string(),
        })?;
        if !resp.status().is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        resp.text().map_err(|e| ScrapeError::Request {
            url: url.to_string(),
            reason: e.without_url().to_string(),
        })
    }
}

pub struct ScrapeSource<F> {
    fetcher: F,
}

impl<F: PageFetcher> ScrapeSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Harvest unique, named series codes from every page of a listing.
    pub fn harvest(&self, base_url: &str) -> Result<Vec<IndicatorCode>, ScrapeError> {
        log::info!("Scraping {base_url}");
        let first = self.fetcher.fetch(base_url)?;

        let mut links = Vec::new();
        match last_page(&first) {
            Some(pages) => {
                log::info!("{pages} page(s) to scrape");
                for page in 1..=pages {
                    let html = self.fetcher.fetch(&page_url(base_url, page)?)?;
                    let found = extract_series_links(&html);
                    log::debug!("Page {page}: {} series links", found.len());
                    links.extend(found);
                }
            }
            None => {
                log::info!("No pagination found; scraping a single page");
                links.extend(extract_series_links(&first));
            }
        }

        Ok(dedupe_codes(links))
    }
}

/// Page count from the "last page" anchor, if the listing has one.
pub fn last_page(html: &str) -> Option<usize> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[title][href]").ok()?;
    document
        .select(&selector)
        .find(|a| {
            a.value()
                .attr("title")
                .is_some_and(|t| t.to_lowercase().contains("last page"))
        })
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| href.rsplit('=').next())
        .and_then(|n| n.trim().parse::<usize>().ok())
}

/// URL of page `page` of a listing: `pageID` is set, other query pairs kept.
pub fn page_url(base_url: &str, page: usize) -> Result<String, ScrapeError> {
    let mut url = Url::parse(base_url).map_err(|e| ScrapeError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "pageID")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("pageID", &page.to_string());
    Ok(url.to_string())
}

/// Every `(code, text)` pair linked as `.../series/<CODE>` on a page.
///
/// Names are whitespace-collapsed but may be empty (image links, icons).
pub fn extract_series_links(html: &str) -> Vec<IndicatorCode> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"a[href*="series/"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let path = href.split(['?', '#']).next().unwrap_or(href);
            let code = path.trim_end_matches('/').rsplit('/').next()?.trim();
            let name = a.text().collect::<Vec<_>>().join(" ");
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(IndicatorCode::new(code, name))
        })
        .collect()
}

/// Drop unnamed entries, then keep the first entry per code.
pub fn dedupe_codes(links: Vec<IndicatorCode>) -> Vec<IndicatorCode> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|c| !c.name.is_empty() && !c.code.is_empty())
        .filter(|c| seen.insert(c.code.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const BASE: &str = "https://fred.stlouisfed.org/searchresults?st=housing";

    fn listing(links: &[(&str, &str)], last: Option<usize>) -> String {
        let mut html = String::from("<html><body>");
        for (code, name) in links {
            html.push_str(&format!(r#"<a href="/series/{code}">{name}</a>"#));
        }
        if let Some(n) = last {
            html.push_str(&format!(
                r#"<a title="go to last page" href="/searchresults?st=housing&pageID={n}">Last</a>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    struct MapFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl PageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn reads_page_count_from_last_page_anchor() {
        assert_eq!(last_page(&listing(&[], Some(7))), Some(7));
        assert_eq!(last_page(&listing(&[("GDP", "GDP")], None)), None);
    }

    #[test]
    fn page_url_sets_page_id() {
        assert_eq!(
            page_url(BASE, 2).unwrap(),
            "https://fred.stlouisfed.org/searchresults?st=housing&pageID=2"
        );
        assert_eq!(
            page_url("https://fred.stlouisfed.org/tags/series?pageID=9", 1).unwrap(),
            "https://fred.stlouisfed.org/tags/series?pageID=1"
        );
        assert!(matches!(page_url("not a url", 1), Err(ScrapeError::InvalidUrl { .. })));
    }

    #[test]
    fn extracts_codes_from_series_links() {
        let html = r#"
            <a href="/series/HOUST">Housing Starts:
                Total</a>
            <a href="https://fred.stlouisfed.org/series/MSPUS/">Median Sales Price</a>
            <a href="/series/HOUST"><img src="x.png"></a>
            <a href="/categories/97">Housing</a>
        "#;
        let links = extract_series_links(html);
        assert_eq!(
            links,
            vec![
                IndicatorCode::new("HOUST", "Housing Starts: Total"),
                IndicatorCode::new("MSPUS", "Median Sales Price"),
                IndicatorCode::new("HOUST", ""),
            ]
        );
    }

    #[test]
    fn dedupe_drops_empty_names_and_repeats() {
        let out = dedupe_codes(vec![
            IndicatorCode::new("A", ""),
            IndicatorCode::new("A", "Alpha"),
            IndicatorCode::new("B", "Beta"),
            IndicatorCode::new("A", "Alpha again"),
        ]);
        assert_eq!(out, vec![IndicatorCode::new("A", "Alpha"), IndicatorCode::new("B", "Beta")]);
    }

    #[test]
    fn harvest_walks_every_page() {
        let mut pages = HashMap::new();
        pages.insert(BASE.to_string(), listing(&[("HOUST", "Housing Starts")], Some(2)));
        pages.insert(
            page_url(BASE, 1).unwrap(),
            listing(&[("HOUST", "Housing Starts"), ("PERMIT", "Permits")], Some(2)),
        );
        pages.insert(
            page_url(BASE, 2).unwrap(),
            listing(&[("MSPUS", "Median Sales Price"), ("PERMIT", "Permits")], Some(2)),
        );
        let fetcher = MapFetcher {
            pages,
            requested: RefCell::new(Vec::new()),
        };
        let source = ScrapeSource::new(fetcher);
        let codes: Vec<String> = source.harvest(BASE).unwrap().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["HOUST", "PERMIT", "MSPUS"]);
        assert_eq!(source.fetcher.requested.borrow().len(), 3);
    }

    #[test]
    fn harvest_without_pagination_uses_base_page() {
        let mut pages = HashMap::new();
        pages.insert(BASE.to_string(), listing(&[("GDP", "Gross Domestic Product")], None));
        let source = ScrapeSource::new(MapFetcher {
            pages,
            requested: RefCell::new(Vec::new()),
        });
        let codes = source.harvest(BASE).unwrap();
        assert_eq!(codes, vec![IndicatorCode::new("GDP", "Gross Domestic Product")]);
    }

    #[test]
    fn harvest_propagates_page_errors() {
        let mut pages = HashMap::new();
        pages.insert(BASE.to_string(), listing(&[], Some(1)));
        let source = ScrapeSource::new(MapFetcher {
            pages,
            requested: RefCell::new(Vec::new()),
        });
        assert!(matches!(source.harvest(BASE), Err(ScrapeError::Status { status: 404, .. })));
    }
}
