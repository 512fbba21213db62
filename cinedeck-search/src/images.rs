//! Image and trailer URL construction.

use cinedeck_core::config::ApiConfig;

/// Resolution buckets offered by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W92,
    W185,
    W300,
    W500,
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W185 => "w185",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

/// Local asset substituted when an image path is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Poster,
    Profile,
}

impl Placeholder {
    pub fn asset(self) -> &'static str {
        match self {
            Placeholder::Poster => "/no-poster.png",
            Placeholder::Profile => "/no-profile.png",
        }
    }
}

/// Builds CDN URLs from the path fragments returned by the metadata API.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.image_base_url.clone())
    }

    /// Full URL for `path` at `size`, or the placeholder asset.
    pub fn url(&self, path: Option<&str>, size: ImageSize, placeholder: Placeholder) -> String {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => {
                format!("{}/{}{}", self.base_url, size.as_str(), path)
            }
            Some(path) => format!("{}/{}/{}", self.base_url, size.as_str(), path),
            None => placeholder.asset().to_string(),
        }
    }
}

/// Watch page for a trailer key on the video platform.
pub fn trailer_watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}
