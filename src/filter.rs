use std::collections::BTreeSet;
use url::Url;

pub const DEFAULT_PREFIXES: [&str; 2] = ["/guides/", "/blog/"];

/// Keeps URLs whose path falls under one of a set of content sections.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    prefixes: Vec<String>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

impl ContentFilter {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let path = parsed.path();
        let path = path.strip_suffix('/').unwrap_or(path);
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Deduplicated, ascending.
    pub fn apply<S: AsRef<str>>(&self, urls: &[S]) -> Vec<String> {
        urls.iter()
            .map(AsRef::<str>::as_ref)
            .filter(|u| self.matches(u))
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Guide and blog pages only.
pub fn filter_content_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    ContentFilter::default().apply(urls)
}
