//! TMDB metadata provider for production use.

use async_trait::async_trait;
use cinedeck_core::ResultPage;
use cinedeck_core::config::ApiConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MediaApiProvider;
use crate::errors::MediaSearchError;
use crate::types::{
    CastMember, CreditRole, DiscoverFilter, MediaDetails, MediaKind, PersonCredit, PersonDetails,
    ReleaseYear, SearchResultItem, Video,
};

/// Default ordering for discovery listings.
const DEFAULT_DISCOVER_SORT: &str = "popularity.desc";

/// TMDB provider for real metadata lookups.
///
/// Every request carries the API key and language as query parameters.
/// Status codes are translated into [`MediaSearchError`] at this boundary.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

/// Paginated envelope shared by listing endpoints.
#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    #[serde(default)]
    page: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

/// Result entry as returned by search, listing and credit endpoints.
#[derive(Debug, Default, Deserialize)]
struct RawMediaItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    profile_path: Option<String>,
    vote_average: Option<f32>,
    popularity: Option<f64>,
    character: Option<String>,
    job: Option<String>,
}

impl RawMediaItem {
    /// Converts into a result item.
    ///
    /// `endpoint_kind` is the kind implied by a single-kind endpoint; it
    /// takes precedence over inference when no explicit tag is present.
    fn into_item(self, endpoint_kind: Option<MediaKind>) -> SearchResultItem {
        let tagged = self.media_type.as_deref().and_then(MediaKind::from_tag);
        let kind = tagged.or(endpoint_kind).unwrap_or_else(|| {
            MediaKind::infer(self.media_type.as_deref(), self.first_air_date.as_deref())
        });

        match kind {
            MediaKind::Person => SearchResultItem {
                kind,
                id: self.id,
                title: self.name.or(self.title).unwrap_or_default(),
                release_year: ReleaseYear::Unknown,
                image_path: self.profile_path,
                rating: None,
                popularity: self.popularity,
            },
            MediaKind::Movie | MediaKind::Series => {
                let date = match kind {
                    MediaKind::Series => self.first_air_date.or(self.release_date),
                    _ => self.release_date.or(self.first_air_date),
                };
                SearchResultItem {
                    kind,
                    id: self.id,
                    title: self.title.or(self.name).unwrap_or_default(),
                    release_year: ReleaseYear::from_date(date.as_deref()),
                    image_path: self.poster_path,
                    rating: self.vote_average,
                    popularity: self.popularity,
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResults<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawCredits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct RawCombinedCredits {
    #[serde(default)]
    cast: Vec<RawMediaItem>,
    #[serde(default)]
    crew: Vec<RawMediaItem>,
}

/// Movie or series record with appended videos and credits.
#[derive(Debug, Deserialize)]
struct RawDetails {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    number_of_seasons: Option<u32>,
    #[serde(default)]
    genres: Vec<RawGenre>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    videos: Option<RawResults<Video>>,
    credits: Option<RawCredits>,
}

impl RawDetails {
    fn into_details(self, kind: MediaKind) -> MediaDetails {
        let release_date = match kind {
            MediaKind::Series => self.first_air_date,
            _ => self.release_date,
        }
        .filter(|d| !d.is_empty());

        let mut cast = self.credits.map(|c| c.cast).unwrap_or_default();
        cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));

        MediaDetails {
            kind,
            id: self.id,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.filter(|o| !o.is_empty()),
            tagline: self.tagline.filter(|t| !t.is_empty()),
            release_year: ReleaseYear::from_date(release_date.as_deref()),
            release_date,
            runtime_minutes: self.runtime,
            number_of_seasons: self.number_of_seasons,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            rating: self.vote_average,
            videos: self.videos.map(|v| v.results).unwrap_or_default(),
            cast,
        }
    }
}

impl TmdbProvider {
    /// Creates a TMDB provider from API configuration.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Configuration` - If the API key is missing or blank,
    ///   or the HTTP client cannot be built
    pub fn from_config(api: &ApiConfig) -> Result<Self, MediaSearchError> {
        let api_key = api
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| MediaSearchError::Configuration {
                reason: "TMDB API key is missing or blank".to_string(),
            })?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(api.timeout)
            .user_agent(api.user_agent)
            .build()
            .map_err(|e| MediaSearchError::Configuration {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: api.language.clone(),
        })
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MediaSearchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(path = %path, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| MediaSearchError::Upstream {
                status: None,
                reason: format!("request to {path} failed: {e}"),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MediaSearchError::NotFound {
                resource: path.to_string(),
            });
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(MediaSearchError::Upstream {
                status: Some(status.as_u16()),
                reason: "API credential was rejected".to_string(),
            });
        }
        if !status.is_success() {
            return Err(MediaSearchError::Upstream {
                status: Some(status.as_u16()),
                reason: format!("{path} returned {status}"),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MediaSearchError::Upstream {
                status: Some(status.as_u16()),
                reason: format!("invalid response body from {path}: {e}"),
            })
    }

    async fn get_page(
        &self,
        path: &str,
        params: &[(&str, String)],
        endpoint_kind: Option<MediaKind>,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let response: PagedResponse<RawMediaItem> = self.get_json(path, params).await?;
        Ok(ResultPage {
            items: response
                .results
                .into_iter()
                .map(|raw| raw.into_item(endpoint_kind))
                .collect(),
            page: response.page,
            total_pages: response.total_pages,
            total_results: response.total_results,
        })
    }
}

#[async_trait]
impl MediaApiProvider for TmdbProvider {
    async fn trending(&self, page: u32) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.get_page(
            "/trending/movie/week",
            &[("page", page.to_string())],
            Some(MediaKind::Movie),
        )
        .await
    }

    async fn popular(
        &self,
        kind: MediaKind,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        self.get_page(
            &format!("/{}/popular", kind.as_str()),
            &[("page", page.to_string())],
            Some(kind),
        )
        .await
    }

    async fn multi_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.get_page(
            "/search/multi",
            &[("query", query.to_string()), ("page", page.to_string())],
            None,
        )
        .await
    }

    async fn search_kind(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        self.get_page(
            &format!("/search/{}", kind.as_str()),
            &[("query", query.to_string()), ("page", page.to_string())],
            Some(kind),
        )
        .await
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MediaSearchError> {
        let kind = kind.require_title()?;
        let path = format!("/{}/{id}", kind.as_str());
        let raw: RawDetails = self
            .get_json(&path, &[("append_to_response", "videos,credits".to_string())])
            .await?;

        if raw.success == Some(false) {
            return Err(MediaSearchError::NotFound { resource: path });
        }

        Ok(raw.into_details(kind))
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<Video>, MediaSearchError> {
        let kind = kind.require_title()?;
        let raw: RawResults<Video> = self
            .get_json(&format!("/{}/{id}/videos", kind.as_str()), &[])
            .await?;
        Ok(raw.results)
    }

    async fn person(&self, id: u64) -> Result<PersonDetails, MediaSearchError> {
        self.get_json(&format!("/person/{id}"), &[]).await
    }

    async fn person_credits(&self, id: u64) -> Result<Vec<PersonCredit>, MediaSearchError> {
        let raw: RawCombinedCredits = self
            .get_json(&format!("/person/{id}/combined_credits"), &[])
            .await?;

        let cast = raw.cast.into_iter().map(|mut credit| {
            let character = credit.character.take().filter(|c| !c.is_empty());
            PersonCredit {
                item: credit.into_item(None),
                role: CreditRole::Cast { character },
            }
        });
        let crew = raw.crew.into_iter().map(|mut credit| {
            let job = credit.job.take().filter(|j| !j.is_empty());
            PersonCredit {
                item: credit.into_item(None),
                role: CreditRole::Crew { job },
            }
        });

        Ok(cast.chain(crew).collect())
    }

    async fn discover(
        &self,
        kind: MediaKind,
        filter: &DiscoverFilter,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        let mut params = vec![
            ("page", page.to_string()),
            (
                "sort_by",
                filter
                    .sort_by
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISCOVER_SORT.to_string()),
            ),
        ];
        if let Some(language) = &filter.original_language {
            params.push(("with_original_language", language.clone()));
        }
        if let Some(region) = &filter.region {
            // discover/tv has no release region; origin country is its analogue
            let key = match kind {
                MediaKind::Series => "with_origin_country",
                _ => "region",
            };
            params.push((key, region.clone()));
        }

        self.get_page(&format!("/discover/{}", kind.as_str()), &params, Some(kind))
            .await
    }
}
