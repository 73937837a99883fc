use crate::config::{FORMAT, Format, Settings};
use crate::error::SitemapError;
use crate::filter::{ContentFilter, DEFAULT_PREFIXES, filter_content_urls};
use crate::sitemap::fetch_sitemap_urls;

/// Sitemap URLs that fall under the configured content sections.
pub async fn targets(settings: &Settings) -> Result<Vec<String>, SitemapError> {
    let urls = fetch_sitemap_urls(&settings.sitemap_url).await?;
    let targets = if settings.prefixes == DEFAULT_PREFIXES {
        filter_content_urls(&urls)
    } else {
        ContentFilter::new(settings.prefixes.clone()).apply(&urls)
    };
    tracing::info!("{} of {} sitemap URLs selected", targets.len(), urls.len());
    Ok(targets)
}

pub async fn list(settings: &Settings) -> surf::Result<()> {
    let targets = targets(settings).await?;
    match FORMAT.get() {
        Some(&Format::Json) => println!("{}", serde_json::to_string_pretty(&targets)?),
        _ => {
            for url in &targets {
                println!("{url}");
            }
            println!("# count: {}", targets.len());
        }
    }
    Ok(())
}
