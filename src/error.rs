use thiserror::Error;

/// Fatal errors that stop a run before or while building the target list.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing {var} in environment or {env_file}")]
    MissingToken { var: &'static str, env_file: String },
    #[error("failed to read {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("sitemap: {0}")]
    Sitemap(#[from] SitemapError),
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML: unbound namespace prefix {0}")]
    UnboundPrefix(String),
    #[error("malformed XML: no root element")]
    NoRoot,
    #[error("malformed XML: unexpected end of document inside <{0}>")]
    Truncated(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single inspection call. Never fatal for the batch.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<surf::Error> for SitemapError {
    fn from(e: surf::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<surf::Error> for InspectError {
    fn from(e: surf::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
