use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use select::node::Node;
use select::predicate::{Class, Name, Predicate};

pub const SKI_REPORT_URL: &str = "https://www.onthesnow.com/skireport";
pub const METADATA_PATH: &str = "backend/resort_info.csv";
pub const OUTPUT_PATH: &str = "../frontend/schnar_map/public/data/daily_ski.csv";

/// Marker on the resort heading spans of onthesnow.com. The hashed class suffix is
/// generated by the site's build and can change upstream without notice.
pub const RESORT_MARKER: &str = "span.h4.styles_h4__1nbGO";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const PAUSE_BEFORE_SCRAPE: Duration = Duration::from_secs(1);
pub const ROW_LIMIT: usize = 20;

/// Everything a run needs to know about where to read from and write to.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub url: String,
    pub metadata_path: PathBuf,
    pub output_path: PathBuf,
    pub selector: MarkerSelector,
    pub timeout: Duration,
    pub pause: Duration,
    pub row_limit: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            url: SKI_REPORT_URL.to_owned(),
            metadata_path: PathBuf::from(METADATA_PATH),
            output_path: PathBuf::from(OUTPUT_PATH),
            selector: MarkerSelector::parse(RESORT_MARKER),
            timeout: REQUEST_TIMEOUT,
            pause: PAUSE_BEFORE_SCRAPE,
            row_limit: ROW_LIMIT,
        }
    }
}

impl EtlConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_selector(mut self, selector: MarkerSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit;
        self
    }
}

/// A `tag.class.class` selector. Matches elements with the given tag (any tag when
/// empty) whose `class` attribute carries every listed class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSelector {
    tag: String,
    classes: Vec<String>,
}

impl MarkerSelector {
    pub fn parse(spec: &str) -> Self {
        let mut parts = spec.trim().split('.');
        let tag = parts.next().unwrap_or_default().to_owned();
        let classes = parts
            .filter(|class| !class.is_empty())
            .map(|class| class.to_owned())
            .collect();

        Self { tag, classes }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl fmt::Display for MarkerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

impl Predicate for &MarkerSelector {
    fn matches(&self, node: &Node) -> bool {
        (self.tag.is_empty() || Name(self.tag.as_str()).matches(node))
            && self.classes.iter().all(|class| Class(class.as_str()).matches(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use select::document::Document;

    #[test]
    fn parses_tag_and_classes() {
        let selector = MarkerSelector::parse("span.h4.styles_h4__1nbGO");
        assert_eq!(selector.tag(), "span");
        assert_eq!(selector.classes(), ["h4", "styles_h4__1nbGO"]);
        assert_eq!(selector.to_string(), "span.h4.styles_h4__1nbGO");
    }

    #[test]
    fn class_only_selector_matches_any_tag() {
        let selector = MarkerSelector::parse(".resort");
        let document = Document::from(r#"<div class="resort">a</div><p class="resort x">b</p>"#);
        assert_eq!(document.find(&selector).count(), 2);
    }

    #[test]
    fn requires_every_class() {
        let selector = MarkerSelector::parse("span.h4.marker");
        let document = Document::from(
            r#"<span class="h4">no</span>
               <span class="marker h4 bold">yes</span>
               <div class="h4 marker">no</div>"#,
        );
        let texts: Vec<String> = document.find(&selector).map(|n| n.text()).collect();
        assert_eq!(texts, vec!["yes".to_owned()]);
    }

    #[test]
    fn defaults_point_at_the_ski_report() {
        let config = EtlConfig::default();
        assert_eq!(config.url, SKI_REPORT_URL);
        assert_eq!(config.row_limit, 20);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.selector.to_string(), RESORT_MARKER);
    }
}
