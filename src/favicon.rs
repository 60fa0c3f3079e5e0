//! Link icons.
//!
//! Fetching and caching favicons is left to a [`FaviconResolver`]
//! supplied by the host; when it has nothing, the first letter of the
//! link title is shown instead.

use crate::catalog::Link;
use crate::config;
use url::Url;

/// Looks up favicon image data for a link URL
pub trait FaviconResolver {
    fn resolve(&mut self, url: &str) -> Option<Vec<u8>>;
}

/// What to draw next to a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkIcon {
    Image(Vec<u8>),
    Glyph(String),
}

/// Favicon service URL for a link, based on its host
pub fn favicon_service_url(link_url: &str) -> Option<String> {
    let url = Url::parse(link_url).ok()?;
    let host = url.host_str()?;
    Some(config::FAVICON_SERVICE_URL.replace("{}", host))
}

/// First character of the title, uppercased
pub fn fallback_glyph(title: &str) -> String {
    title
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

pub fn link_icon<R: FaviconResolver + ?Sized>(resolver: &mut R, link: &Link) -> LinkIcon {
    match resolver.resolve(&link.url) {
        Some(data) => LinkIcon::Image(data),
        None => LinkIcon::Glyph(fallback_glyph(&link.title)),
    }
}
