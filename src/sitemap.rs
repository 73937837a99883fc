//! Sitemap download and `<loc>` extraction.

use crate::env_keys::ENV_MOCK_SITEMAP;
use crate::error::SitemapError;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

pub async fn fetch_sitemap_urls(sitemap_url: &str) -> Result<Vec<String>, SitemapError> {
    let body = if let Ok(path) = std::env::var(ENV_MOCK_SITEMAP) {
        tracing::debug!("reading sitemap from {}", path);
        std::fs::read_to_string(path)?
    } else {
        tracing::debug!("GET {}", sitemap_url);
        let mut res = surf::client()
            .with(surf::middleware::Redirect::default())
            .get(sitemap_url)
            .await?;
        if !res.status().is_success() {
            return Err(SitemapError::Status(res.status().into()));
        }
        res.body_string().await?
    };
    let urls = parse_locs(&body)?;
    tracing::info!("sitemap lists {} URLs", urls.len());
    Ok(urls)
}

struct Loc {
    depth: usize,
    text: String,
    // set once a child element opens inside the `loc`
    sealed: bool,
}

fn namespace_of(res: &ResolveResult) -> Result<Option<Vec<u8>>, SitemapError> {
    match res {
        ResolveResult::Bound(ns) => Ok(Some(ns.as_ref().to_vec())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(SitemapError::UnboundPrefix(
            String::from_utf8_lossy(prefix).into_owned(),
        )),
    }
}

/// Trimmed text of every `loc` element, in document order.
///
/// Only `loc` elements in the root element's namespace are collected, so a
/// default `xmlns` on `<urlset>` gives the same result as no namespace at all.
/// Text after the first child element of a `loc` is not part of its value.
pub fn parse_locs(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = NsReader::from_str(xml);
    let mut root_ns: Option<Option<Vec<u8>>> = None;
    let mut open: Vec<String> = Vec::new();
    let mut current: Option<Loc> = None;
    let mut urls = Vec::new();

    loop {
        let (res, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(ref e) => {
                let ns = namespace_of(&res)?;
                let root = root_ns.get_or_insert_with(|| ns.clone());
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                if let Some(loc) = current.as_mut() {
                    loc.sealed = true;
                } else if e.local_name().as_ref() == b"loc" && ns == *root {
                    current = Some(Loc {
                        depth: open.len(),
                        text: String::new(),
                        sealed: false,
                    });
                }
            }
            Event::Empty(_) => {
                namespace_of(&res)?;
                if root_ns.is_none() {
                    // a lone `<urlset/>` has nothing to list
                    return Ok(urls);
                }
                if let Some(loc) = current.as_mut() {
                    loc.sealed = true;
                }
            }
            Event::Text(ref e) => {
                if let Some(loc) = current.as_mut().filter(|l| !l.sealed) {
                    loc.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(loc) = current.as_mut().filter(|l| !l.sealed) {
                    loc.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if let Some(loc) = current.take_if(|l| l.depth == open.len()) {
                    let text = loc.text.trim();
                    if !text.is_empty() {
                        urls.push(text.to_owned());
                    }
                }
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(SitemapError::Truncated(name));
    }
    if root_ns.is_none() {
        return Err(SitemapError::NoRoot);
    }
    Ok(urls)
}
