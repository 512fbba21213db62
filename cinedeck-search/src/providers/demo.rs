//! Demo provider backed by a small built-in catalog.
//!
//! Serves realistic data for UI development and offline runs without an
//! API credential. Supports every provider operation, including person
//! credits, so search expansion can be exercised end to end.

use async_trait::async_trait;
use cinedeck_core::{ResultPage, page_window, total_pages_for};

use super::MediaApiProvider;
use crate::errors::MediaSearchError;
use crate::types::{
    CastMember, CreditRole, DiscoverFilter, MediaDetails, MediaKind, PersonCredit, PersonDetails,
    ReleaseYear, SearchResultItem, Video,
};

/// Page size used by the upstream API.
const DEMO_PAGE_SIZE: usize = 20;

#[derive(Debug)]
struct DemoTitle {
    kind: MediaKind,
    id: u64,
    title: &'static str,
    date: &'static str,
    language: &'static str,
    region: &'static str,
    genres: &'static [&'static str],
    overview: &'static str,
    rating: f32,
    popularity: f64,
    trailer: Option<&'static str>,
}

#[derive(Debug)]
struct DemoPerson {
    id: u64,
    name: &'static str,
    department: &'static str,
    birthday: &'static str,
    place_of_birth: &'static str,
    popularity: f64,
    /// (kind, title id, character or job, is cast)
    credits: &'static [(MediaKind, u64, &'static str, bool)],
}

const TITLES: &[DemoTitle] = &[
    DemoTitle {
        kind: MediaKind::Movie,
        id: 603,
        title: "The Matrix",
        date: "1999-03-30",
        language: "en",
        region: "US",
        genres: &["Action", "Science Fiction"],
        overview: "A hacker learns the world he lives in is a simulation.",
        rating: 8.2,
        popularity: 88.5,
        trailer: Some("vKQi3bBA1y8"),
    },
    DemoTitle {
        kind: MediaKind::Movie,
        id: 245891,
        title: "John Wick",
        date: "2014-10-22",
        language: "en",
        region: "US",
        genres: &["Action", "Thriller"],
        overview: "An ex-hitman comes out of retirement.",
        rating: 7.4,
        popularity: 95.1,
        trailer: Some("C0BMx-qxsP4"),
    },
    DemoTitle {
        kind: MediaKind::Movie,
        id: 27205,
        title: "Inception",
        date: "2010-07-15",
        language: "en",
        region: "US",
        genres: &["Action", "Science Fiction", "Adventure"],
        overview: "A thief steals secrets through dream-sharing technology.",
        rating: 8.4,
        popularity: 92.3,
        trailer: Some("YoHD9XEInc0"),
    },
    DemoTitle {
        kind: MediaKind::Movie,
        id: 157336,
        title: "Interstellar",
        date: "2014-11-05",
        language: "en",
        region: "US",
        genres: &["Adventure", "Drama", "Science Fiction"],
        overview: "Explorers travel through a wormhole in search of a new home.",
        rating: 8.4,
        popularity: 90.7,
        trailer: None,
    },
    DemoTitle {
        kind: MediaKind::Movie,
        id: 496243,
        title: "Parasite",
        date: "2019-05-30",
        language: "ko",
        region: "KR",
        genres: &["Comedy", "Thriller", "Drama"],
        overview: "A poor family schemes to become employed by a wealthy one.",
        rating: 8.5,
        popularity: 70.2,
        trailer: Some("5xH0HfJHsaY"),
    },
    DemoTitle {
        kind: MediaKind::Series,
        id: 1396,
        title: "Breaking Bad",
        date: "2008-01-20",
        language: "en",
        region: "US",
        genres: &["Drama", "Crime"],
        overview: "A chemistry teacher turns to manufacturing methamphetamine.",
        rating: 8.9,
        popularity: 85.0,
        trailer: Some("HhesaQXLuRY"),
    },
    DemoTitle {
        kind: MediaKind::Series,
        id: 93405,
        title: "Squid Game",
        date: "2021-09-17",
        language: "ko",
        region: "KR",
        genres: &["Action & Adventure", "Mystery", "Drama"],
        overview: "Contestants play deadly children's games for a cash prize.",
        rating: 7.8,
        popularity: 99.4,
        trailer: Some("oqxAJKy0ii4"),
    },
    DemoTitle {
        kind: MediaKind::Series,
        id: 94796,
        title: "Crash Landing on You",
        date: "2019-12-14",
        language: "ko",
        region: "KR",
        genres: &["Comedy", "Drama"],
        overview: "A paraglider lands in North Korea and meets an army officer.",
        rating: 8.6,
        popularity: 60.8,
        trailer: None,
    },
    DemoTitle {
        kind: MediaKind::Series,
        id: 64197,
        title: "Nirvana in Fire",
        date: "2015-09-19",
        language: "zh",
        region: "CN",
        genres: &["Drama", "Action & Adventure"],
        overview: "A strategist returns to the capital to right old wrongs.",
        rating: 8.7,
        popularity: 41.9,
        trailer: None,
    },
    DemoTitle {
        kind: MediaKind::Series,
        id: 70523,
        title: "Dark",
        date: "2017-12-01",
        language: "de",
        region: "DE",
        genres: &["Crime", "Drama", "Mystery"],
        overview: "A missing child exposes secrets spanning four generations.",
        rating: 8.4,
        popularity: 55.6,
        trailer: Some("rrwycJ08PSA"),
    },
];

const PEOPLE: &[DemoPerson] = &[
    DemoPerson {
        id: 6384,
        name: "Keanu Reeves",
        department: "Acting",
        birthday: "1964-09-02",
        place_of_birth: "Beirut, Lebanon",
        popularity: 64.2,
        credits: &[
            (MediaKind::Movie, 603, "Neo", true),
            (MediaKind::Movie, 245891, "John Wick", true),
        ],
    },
    DemoPerson {
        id: 525,
        name: "Christopher Nolan",
        department: "Directing",
        birthday: "1970-07-30",
        place_of_birth: "London, England, UK",
        popularity: 21.5,
        credits: &[
            (MediaKind::Movie, 27205, "Director", false),
            (MediaKind::Movie, 157336, "Director", false),
        ],
    },
    DemoPerson {
        id: 17419,
        name: "Bryan Cranston",
        department: "Acting",
        birthday: "1956-03-07",
        place_of_birth: "Hollywood, California, USA",
        popularity: 30.1,
        credits: &[(MediaKind::Series, 1396, "Walter White", true)],
    },
    DemoPerson {
        id: 1024395,
        name: "Lee Jung-jae",
        department: "Acting",
        birthday: "1972-12-15",
        place_of_birth: "Seoul, South Korea",
        popularity: 18.4,
        credits: &[(MediaKind::Series, 93405, "Seong Gi-hun", true)],
    },
];

impl DemoTitle {
    fn poster_path(&self) -> String {
        format!("/demo/{}-{}.jpg", self.kind.as_str(), self.id)
    }

    fn to_item(&self) -> SearchResultItem {
        SearchResultItem {
            kind: self.kind,
            id: self.id,
            title: self.title.to_string(),
            release_year: ReleaseYear::from_date(Some(self.date)),
            image_path: Some(self.poster_path()),
            rating: Some(self.rating),
            popularity: Some(self.popularity),
        }
    }

    fn videos(&self) -> Vec<Video> {
        let mut videos = vec![Video {
            key: format!("demo-teaser-{}", self.id),
            name: "Teaser".to_string(),
            site: "YouTube".to_string(),
            video_type: "Teaser".to_string(),
        }];
        if let Some(key) = self.trailer {
            videos.push(Video {
                key: key.to_string(),
                name: "Official Trailer".to_string(),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
            });
        }
        videos
    }
}

impl DemoPerson {
    fn to_item(&self) -> SearchResultItem {
        SearchResultItem {
            kind: MediaKind::Person,
            id: self.id,
            title: self.name.to_string(),
            release_year: ReleaseYear::Unknown,
            image_path: None,
            rating: None,
            popularity: Some(self.popularity),
        }
    }
}

/// Demo provider for development and offline use.
#[derive(Debug, Default)]
pub struct DemoProvider;

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }

    fn find_title(kind: MediaKind, id: u64) -> Result<&'static DemoTitle, MediaSearchError> {
        TITLES
            .iter()
            .find(|t| t.kind == kind && t.id == id)
            .ok_or_else(|| MediaSearchError::NotFound {
                resource: format!("/{}/{id}", kind.as_str()),
            })
    }

    fn find_person(id: u64) -> Result<&'static DemoPerson, MediaSearchError> {
        PEOPLE
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MediaSearchError::NotFound {
                resource: format!("/person/{id}"),
            })
    }

    fn paginate(items: Vec<SearchResultItem>, page: u32) -> ResultPage<SearchResultItem> {
        let total_results = items.len() as u64;
        let total_pages = if items.is_empty() {
            0
        } else {
            total_pages_for(items.len(), DEMO_PAGE_SIZE)
        };
        ResultPage {
            items: page_window(&items, page, DEMO_PAGE_SIZE).to_vec(),
            page,
            total_pages,
            total_results,
        }
    }

    fn by_popularity(mut items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
        items.sort_by(|a, b| {
            b.popularity
                .unwrap_or_default()
                .total_cmp(&a.popularity.unwrap_or_default())
        });
        items
    }

    fn matches(haystack: &str, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        !query.is_empty() && haystack.to_lowercase().contains(&query)
    }
}

#[async_trait]
impl MediaApiProvider for DemoProvider {
    async fn trending(&self, page: u32) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let movies = TITLES
            .iter()
            .filter(|t| t.kind == MediaKind::Movie)
            .map(DemoTitle::to_item)
            .collect();
        Ok(Self::paginate(Self::by_popularity(movies), page))
    }

    async fn popular(
        &self,
        kind: MediaKind,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        let titles = TITLES
            .iter()
            .filter(|t| t.kind == kind)
            .map(DemoTitle::to_item)
            .collect();
        Ok(Self::paginate(Self::by_popularity(titles), page))
    }

    async fn multi_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        // people first so a name query puts the person at the top
        let people = PEOPLE
            .iter()
            .filter(|p| Self::matches(p.name, query))
            .map(DemoPerson::to_item);
        let titles = TITLES
            .iter()
            .filter(|t| Self::matches(t.title, query))
            .map(DemoTitle::to_item);
        Ok(Self::paginate(people.chain(titles).collect(), page))
    }

    async fn search_kind(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        let titles = TITLES
            .iter()
            .filter(|t| t.kind == kind && Self::matches(t.title, query))
            .map(DemoTitle::to_item)
            .collect();
        Ok(Self::paginate(titles, page))
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MediaSearchError> {
        let title = Self::find_title(kind.require_title()?, id)?;
        let cast = PEOPLE
            .iter()
            .flat_map(|person| {
                person
                    .credits
                    .iter()
                    .filter(|(k, title_id, _, is_cast)| {
                        *k == title.kind && *title_id == title.id && *is_cast
                    })
                    .map(move |(_, _, character, _)| (person, *character))
            })
            .enumerate()
            .map(|(order, (person, character))| CastMember {
                id: person.id,
                name: person.name.to_string(),
                character: Some(character.to_string()),
                profile_path: None,
                order: u32::try_from(order).ok(),
            })
            .collect();

        Ok(MediaDetails {
            kind: title.kind,
            id: title.id,
            title: title.title.to_string(),
            overview: Some(title.overview.to_string()),
            tagline: None,
            release_date: Some(title.date.to_string()),
            release_year: ReleaseYear::from_date(Some(title.date)),
            runtime_minutes: (title.kind == MediaKind::Movie).then_some(120),
            number_of_seasons: (title.kind == MediaKind::Series).then_some(1),
            genres: title.genres.iter().map(|g| g.to_string()).collect(),
            poster_path: Some(title.poster_path()),
            backdrop_path: None,
            rating: Some(title.rating),
            videos: title.videos(),
            cast,
        })
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<Video>, MediaSearchError> {
        Ok(Self::find_title(kind.require_title()?, id)?.videos())
    }

    async fn person(&self, id: u64) -> Result<PersonDetails, MediaSearchError> {
        let person = Self::find_person(id)?;
        Ok(PersonDetails {
            id: person.id,
            name: person.name.to_string(),
            biography: None,
            birthday: Some(person.birthday.to_string()),
            deathday: None,
            place_of_birth: Some(person.place_of_birth.to_string()),
            known_for_department: Some(person.department.to_string()),
            profile_path: None,
        })
    }

    async fn person_credits(&self, id: u64) -> Result<Vec<PersonCredit>, MediaSearchError> {
        let person = Self::find_person(id)?;
        let mut credits = Vec::with_capacity(person.credits.len());
        // cast before crew, matching the upstream combined listing
        for wanted_cast in [true, false] {
            for (kind, title_id, role, is_cast) in person.credits {
                if *is_cast != wanted_cast {
                    continue;
                }
                let title = Self::find_title(*kind, *title_id)?;
                let role = if *is_cast {
                    CreditRole::Cast {
                        character: Some(role.to_string()),
                    }
                } else {
                    CreditRole::Crew {
                        job: Some(role.to_string()),
                    }
                };
                credits.push(PersonCredit {
                    item: title.to_item(),
                    role,
                });
            }
        }
        Ok(credits)
    }

    async fn discover(
        &self,
        kind: MediaKind,
        filter: &DiscoverFilter,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        let titles = TITLES
            .iter()
            .filter(|t| t.kind == kind)
            .filter(|t| {
                filter
                    .original_language
                    .as_deref()
                    .is_none_or(|lang| t.language.eq_ignore_ascii_case(lang))
            })
            .filter(|t| {
                filter
                    .region
                    .as_deref()
                    .is_none_or(|region| t.region.eq_ignore_ascii_case(region))
            })
            .map(DemoTitle::to_item)
            .collect::<Vec<_>>();

        let titles = match filter.sort_by.as_deref() {
            Some("vote_average.desc") => {
                let mut titles = titles;
                titles.sort_by(|a, b| {
                    b.rating
                        .unwrap_or_default()
                        .total_cmp(&a.rating.unwrap_or_default())
                });
                titles
            }
            _ => Self::by_popularity(titles),
        };

        Ok(Self::paginate(titles, page))
    }
}
