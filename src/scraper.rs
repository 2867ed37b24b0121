use reqwest::{Client, StatusCode};
use select::document::Document;
use tracing::{debug, info, warn};

use crate::config::{EtlConfig, MarkerSelector};
use crate::error::{EtlError, NoDataReason, Result};

/// One piece of page text, before it is interpreted as a field.
pub type RawFragment = String;

pub const NO_NAME: &str = "No Name";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; SkiReportEtl/0.1)";

#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Vec<RawFragment>),
    NoData(NoDataReason),
}

impl FetchOutcome {
    pub fn into_result(self) -> std::result::Result<Vec<RawFragment>, NoDataReason> {
        match self {
            FetchOutcome::Fetched(fragments) => Ok(fragments),
            FetchOutcome::NoData(reason) => Err(reason),
        }
    }
}

pub struct Scraper {
    url: String,
    selector: MarkerSelector,
    client: Client,
}

impl Scraper {
    pub fn new(config: &EtlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(EtlError::Client)?;

        Ok(Self {
            url: config.url.clone(),
            selector: config.selector.clone(),
            client,
        })
    }

    /// Single GET, no retries. Anything but a 200 comes back as `NoData`.
    pub async fn scrape_fragments(&self) -> FetchOutcome {
        info!(url = %self.url, "Scraping ski report");

        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %self.url, error = %err, "Request failed");
                return FetchOutcome::NoData(NoDataReason::Network(err));
            }
        };

        if response.status() != StatusCode::OK {
            warn!(
                url = %self.url,
                status = %response.status(),
                "Failed to retrieve the webpage"
            );
            return FetchOutcome::NoData(NoDataReason::HttpStatus(response.status()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(url = %self.url, error = %err, "Failed to read response body");
                return FetchOutcome::NoData(NoDataReason::Network(err));
            }
        };

        let fragments = extract_fragments(&body, &self.selector);
        debug!(count = fragments.len(), selector = %self.selector, "Extracted fragments");

        FetchOutcome::Fetched(fragments)
    }
}

/// Trimmed text of every element matching `selector`, in page order.
///
/// Elements whose text trims to nothing, whitespace-only ones included, come back
/// as [`NO_NAME`] rather than an empty string.
pub fn extract_fragments(html: &str, selector: &MarkerSelector) -> Vec<RawFragment> {
    let document = Document::from(html);

    document
        .find(selector)
        .map(|node| {
            let text = node.text().trim().to_owned();
            if text.is_empty() {
                NO_NAME.to_owned()
            } else {
                text
            }
        })
        .collect()
}
