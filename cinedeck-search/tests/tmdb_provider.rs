//! TMDB provider tests against a mock HTTP upstream.

use cinedeck_core::CinedeckConfig;
use cinedeck_search::providers::MediaApiProvider;
use cinedeck_search::{
    CreditRole, DiscoverFilter, MediaKind, MediaSearchError, ReleaseYear, TmdbProvider,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn provider_for(server: &MockServer) -> TmdbProvider {
    let mut config = CinedeckConfig::for_testing();
    config.api.base_url = server.uri();
    TmdbProvider::from_config(&config.api).unwrap()
}

#[tokio::test]
async fn test_trending_sends_credential_and_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/week"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "total_pages": 7,
            "total_results": 140,
            "results": [
                {"id": 603, "title": "The Matrix", "release_date": "1999-03-30",
                 "poster_path": "/matrix.jpg", "vote_average": 8.2, "media_type": "movie"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = provider_for(&server).await.trending(2).await.unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 7);
    assert_eq!(page.items[0].title, "The Matrix");
    assert_eq!(page.items[0].release_year, ReleaseYear::Known(1999));
    assert_eq!(page.items[0].image_path.as_deref(), Some("/matrix.jpg"));
}

#[tokio::test]
async fn test_multi_search_tags_each_result_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "keanu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "total_results": 3,
            "results": [
                {"id": 6384, "name": "Keanu Reeves", "media_type": "person",
                 "profile_path": "/keanu.jpg"},
                {"id": 603, "title": "The Matrix", "media_type": "movie",
                 "release_date": "1999-03-30"},
                {"id": 1396, "name": "Breaking Bad", "media_type": "tv",
                 "first_air_date": "2008-01-20"}
            ]
        })))
        .mount(&server)
        .await;

    let page = provider_for(&server)
        .await
        .multi_search("keanu", 1)
        .await
        .unwrap();
    let kinds: Vec<_> = page.items.iter().map(|item| item.kind).collect();

    assert_eq!(kinds, vec![MediaKind::Person, MediaKind::Movie, MediaKind::Series]);
    assert_eq!(page.items[0].title, "Keanu Reeves");
    assert_eq!(page.items[2].release_year, ReleaseYear::Known(2008));
}

#[tokio::test]
async fn test_zero_total_pages_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "total_pages": 0, "total_results": 0, "results": []
        })))
        .mount(&server)
        .await;

    let page = provider_for(&server).await.trending(1).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_missing_title_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .await
        .details(MediaKind::Movie, 999999)
        .await;
    assert!(matches!(result, Err(MediaSearchError::NotFound { .. })));
}

#[tokio::test]
async fn test_server_error_maps_to_upstream_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/popular"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .await
        .popular(MediaKind::Series, 1)
        .await;
    assert!(matches!(
        result,
        Err(MediaSearchError::Upstream {
            status: Some(500),
            ..
        })
    ));
}

#[tokio::test]
async fn test_malformed_body_maps_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .await
        .search_kind(MediaKind::Movie, "alien", 1)
        .await;
    assert!(matches!(result, Err(MediaSearchError::Upstream { .. })));
}

#[tokio::test]
async fn test_details_include_videos_and_ordered_cast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1396"))
        .and(query_param("append_to_response", "videos,credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "genres": [{"id": 18, "name": "Drama"}],
            "vote_average": 8.9,
            "videos": {"results": [
                {"key": "teaser", "name": "Teaser", "site": "YouTube", "type": "Teaser"},
                {"key": "HhesaQXLuRY", "name": "Trailer", "site": "YouTube", "type": "Trailer"}
            ]},
            "credits": {"cast": [
                {"id": 84497, "name": "Aaron Paul", "character": "Jesse Pinkman", "order": 1},
                {"id": 17419, "name": "Bryan Cranston", "character": "Walter White", "order": 0}
            ]}
        })))
        .mount(&server)
        .await;

    let details = provider_for(&server)
        .await
        .details(MediaKind::Series, 1396)
        .await
        .unwrap();

    assert_eq!(details.kind, MediaKind::Series);
    assert_eq!(details.title, "Breaking Bad");
    assert_eq!(details.genres, vec!["Drama".to_string()]);
    assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("HhesaQXLuRY"));
    assert_eq!(details.cast[0].name, "Bryan Cranston");
}

#[tokio::test]
async fn test_combined_credits_infer_kind_and_keep_cast_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/17419/combined_credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cast": [
                {"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20",
                 "character": "Walter White"},
                {"id": 9, "title": "Argo", "release_date": "2012-10-11",
                 "media_type": "movie", "character": "Jack O'Donnell"}
            ],
            "crew": [
                {"id": 1396, "name": "Breaking Bad", "media_type": "tv",
                 "first_air_date": "2008-01-20", "job": "Director"}
            ]
        })))
        .mount(&server)
        .await;

    let credits = provider_for(&server)
        .await
        .person_credits(17419)
        .await
        .unwrap();

    assert_eq!(credits.len(), 3);
    assert_eq!(credits[0].item.kind, MediaKind::Series);
    assert_eq!(credits[1].item.kind, MediaKind::Movie);
    assert_eq!(
        credits[2].role,
        CreditRole::Crew {
            job: Some("Director".to_string())
        }
    );
}

#[tokio::test]
async fn test_discover_forwards_filter_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("with_original_language", "ko"))
        .and(query_param("with_origin_country", "KR"))
        .and(query_param("sort_by", "vote_average.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "total_pages": 1, "total_results": 1,
            "results": [{"id": 93405, "name": "Squid Game", "first_air_date": "2021-09-17"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = DiscoverFilter {
        original_language: Some("ko".to_string()),
        region: Some("KR".to_string()),
        sort_by: Some("vote_average.desc".to_string()),
    };
    let page = provider_for(&server)
        .await
        .discover(MediaKind::Series, &filter, 1)
        .await
        .unwrap();

    assert_eq!(page.items[0].kind, MediaKind::Series);
    assert_eq!(page.items[0].title, "Squid Game");
}

#[tokio::test]
async fn test_discover_movies_default_to_popularity_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("region", "US"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "total_pages": 1, "total_results": 0, "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = provider_for(&server)
        .await
        .discover(MediaKind::Movie, &DiscoverFilter::region("US"), 1)
        .await
        .unwrap();
    assert!(page.is_empty());
}
