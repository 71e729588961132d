//! Sitemap location discovery

use crate::crawler::PageFetcher;

/// Conventional sitemap locations, probed in this order
pub const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/post-sitemap.xml",
    "/page-sitemap.xml",
    "/wp-sitemap.xml",
];

/// Probes the conventional sitemap paths under `base_url`
///
/// Trailing slashes on the base URL are stripped before the paths are appended.
/// Returns the first URL that answers HTTP 200 to a HEAD request.
pub async fn discover_sitemap<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
) -> Option<String> {
    let base = base_url.trim_end_matches('/');
    tracing::info!("Looking for a sitemap under {}", base);

    for path in SITEMAP_PATHS {
        let candidate = format!("{}{}", base, path);
        if fetcher.probe(&candidate).await {
            tracing::info!("Found sitemap: {}", candidate);
            return Some(candidate);
        }
    }

    tracing::warn!("No sitemap found under {}", base);
    None
}
