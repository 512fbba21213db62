//! Response bodies for the JSON API.
//!
//! Domain records are flattened into what a browsing UI renders directly:
//! resolved image URLs, a link target per item and pagination metadata.

use cinedeck_core::ResultPage;
use cinedeck_search::{
    AggregationState, CastMember, HomeFeed, ImageSize, ImageUrls, MediaDetails, MediaKind,
    PaginationMode, PersonProfile, Placeholder, ReleaseYear, SearchResultItem, trailer_watch_url,
};
use serde::Serialize;

/// One card in a result grid.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub kind: MediaKind,
    pub id: u64,
    pub title: String,
    pub release_year: ReleaseYear,
    pub rating: Option<f32>,
    pub image_url: String,
    /// API route serving this item's details
    pub href: String,
}

fn detail_href(kind: MediaKind, id: u64) -> String {
    match kind {
        MediaKind::Person => format!("/api/person/{id}"),
        MediaKind::Movie | MediaKind::Series => format!("/api/title/{}/{id}", kind.as_str()),
    }
}

impl ItemView {
    pub fn new(item: SearchResultItem, images: &ImageUrls) -> Self {
        let (size, placeholder) = match item.kind {
            MediaKind::Person => (ImageSize::W185, Placeholder::Profile),
            MediaKind::Movie | MediaKind::Series => (ImageSize::W300, Placeholder::Poster),
        };
        Self {
            image_url: images.url(item.image_path.as_deref(), size, placeholder),
            href: detail_href(item.kind, item.id),
            kind: item.kind,
            id: item.id,
            title: item.title,
            release_year: item.release_year,
            rating: item.rating,
        }
    }
}

fn item_views(items: Vec<SearchResultItem>, images: &ImageUrls) -> Vec<ItemView> {
    items
        .into_iter()
        .map(|item| ItemView::new(item, images))
        .collect()
}

/// A page of a listing. `error` carries a code when the listing failed
/// and was reset to an empty page.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub items: Vec<ItemView>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ListingView {
    pub fn new(page: ResultPage<SearchResultItem>, images: &ImageUrls) -> Self {
        Self {
            items: item_views(page.items, images),
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            error: None,
        }
    }

    /// Empty single page shown after a failed listing request.
    pub fn failed(code: &'static str) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
            error: Some(code),
        }
    }
}

/// Aggregated search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    #[serde(flatten)]
    pub listing: ListingView,
    pub mode: PaginationMode,
    pub expanded_person: Option<u64>,
}

impl SearchView {
    pub fn new(state: AggregationState, images: &ImageUrls) -> Self {
        let AggregationState {
            query,
            items,
            page,
            total_pages,
            total_results,
            mode,
            expanded_person,
        } = state;
        let listing = ListingView::new(
            ResultPage {
                items,
                page,
                total_pages,
                total_results,
            },
            images,
        );
        Self {
            query,
            listing,
            mode,
            expanded_person,
        }
    }

    pub fn failed(query: &str, code: &'static str) -> Self {
        Self {
            query: query.trim().to_string(),
            listing: ListingView::failed(code),
            mode: PaginationMode::Server,
            expanded_person: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CastView {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub image_url: String,
}

impl CastView {
    fn new(member: CastMember, images: &ImageUrls) -> Self {
        Self {
            image_url: images.url(
                member.profile_path.as_deref(),
                ImageSize::W185,
                Placeholder::Profile,
            ),
            id: member.id,
            name: member.name,
            character: member.character,
        }
    }
}

/// Detail page of a movie or series.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub kind: MediaKind,
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub release_year: ReleaseYear,
    pub runtime_minutes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub genres: Vec<String>,
    pub rating: Option<f32>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub trailer_url: Option<String>,
    pub cast: Vec<CastView>,
}

impl DetailsView {
    pub fn new(details: MediaDetails, images: &ImageUrls) -> Self {
        let trailer_url = details.trailer().map(|video| trailer_watch_url(&video.key));
        Self {
            poster_url: images.url(
                details.poster_path.as_deref(),
                ImageSize::W500,
                Placeholder::Poster,
            ),
            backdrop_url: images.url(
                details.backdrop_path.as_deref(),
                ImageSize::Original,
                Placeholder::Poster,
            ),
            trailer_url,
            cast: details
                .cast
                .into_iter()
                .map(|member| CastView::new(member, images))
                .collect(),
            kind: details.kind,
            id: details.id,
            title: details.title,
            overview: details.overview,
            tagline: details.tagline,
            release_date: details.release_date,
            release_year: details.release_year,
            runtime_minutes: details.runtime_minutes,
            number_of_seasons: details.number_of_seasons,
            genres: details.genres,
            rating: details.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailerView {
    pub key: Option<String>,
    pub url: Option<String>,
}

impl TrailerView {
    pub fn new(key: Option<String>) -> Self {
        let url = key.as_deref().map(trailer_watch_url);
        Self { key, url }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    pub id: u64,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub image_url: String,
    pub known_for: Vec<ItemView>,
}

impl PersonView {
    pub fn new(profile: PersonProfile, images: &ImageUrls) -> Self {
        let details = profile.details;
        Self {
            image_url: images.url(
                details.profile_path.as_deref(),
                ImageSize::W300,
                Placeholder::Profile,
            ),
            id: details.id,
            name: details.name,
            biography: details.biography,
            birthday: details.birthday,
            deathday: details.deathday,
            place_of_birth: details.place_of_birth,
            known_for_department: details.known_for_department,
            known_for: item_views(profile.known_for, images),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: MediaKind,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub trending: Vec<ItemView>,
    pub sections: Vec<SectionView>,
}

impl HomeView {
    pub fn new(feed: HomeFeed, images: &ImageUrls) -> Self {
        Self {
            trending: item_views(feed.trending, images),
            sections: feed
                .sections
                .into_iter()
                .map(|section| SectionView {
                    id: section.id,
                    title: section.title,
                    kind: section.kind,
                    items: item_views(section.items, images),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_view_resolves_image_and_link() {
        let images = ImageUrls::new("https://image.tmdb.org/t/p");
        let person = ItemView::new(
            SearchResultItem {
                kind: MediaKind::Person,
                id: 6384,
                title: "Keanu Reeves".to_string(),
                release_year: ReleaseYear::Unknown,
                image_path: None,
                rating: None,
                popularity: None,
            },
            &images,
        );
        let series = ItemView::new(
            SearchResultItem {
                kind: MediaKind::Series,
                id: 1396,
                title: "Breaking Bad".to_string(),
                release_year: ReleaseYear::Known(2008),
                image_path: Some("/bb.jpg".to_string()),
                rating: Some(8.9),
                popularity: None,
            },
            &images,
        );

        assert_eq!(person.image_url, "/no-profile.png");
        assert_eq!(person.href, "/api/person/6384");
        assert_eq!(series.image_url, "https://image.tmdb.org/t/p/w300/bb.jpg");
        assert_eq!(series.href, "/api/title/tv/1396");
    }

    #[test]
    fn test_trailer_view_without_key() {
        let view = TrailerView::new(None);
        assert!(view.key.is_none() && view.url.is_none());
    }
}
