//! HTTP request handlers organized by functionality

pub mod api;
pub mod pages;

// Re-export handler functions
pub use api::{
    DiscoverQuery, PageQuery, SearchQuery, api_discover, api_health, api_home, api_person,
    api_popular, api_search, api_search_kind, api_title, api_trailer, api_trending,
};
pub use pages::{home_page, login_page, register_page};
