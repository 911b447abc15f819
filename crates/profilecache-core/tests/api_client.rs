// Tests for `ApiClient` against a mock profile service using wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profilecache_core::{ApiClient, ApiError, CoreError, FileStore, ProfileCache, ProfileTheme};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client =
        ApiClient::with_base_url(format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap();
    (server, client)
}

fn user(username: &str, age: u32, gender: &str) -> Value {
    json!({
        "gender": gender,
        "name": { "title": "Ms", "first": "Jane", "last": "Roe" },
        "location": {
            "street": { "number": 4242, "name": "Elm Street" },
            "city": "Billings",
            "state": "Montana",
            "country": "United States",
            "postcode": 59101,
            "coordinates": { "latitude": "45.7833", "longitude": "-108.5007" },
            "timezone": { "offset": "-7:00", "description": "Mountain Time" }
        },
        "email": format!("{}@example.com", username),
        "login": { "uuid": "b3c1", "username": username, "password": "hunter2" },
        "dob": { "date": "1994-03-02T11:20:31.127Z", "age": age },
        "registered": { "date": "2010-01-01T00:00:00.000Z", "age": 14 },
        "phone": "(406) 555-0142",
        "cell": "(406) 555-0199",
        "id": { "name": "SSN", "value": "000-00-0000" },
        "picture": {
            "large": "https://randomuser.me/api/portraits/women/1.jpg",
            "medium": "https://randomuser.me/api/portraits/med/women/1.jpg",
            "thumbnail": "https://randomuser.me/api/portraits/thumb/women/1.jpg"
        },
        "nat": "US"
    })
}

fn envelope(results: Vec<Value>) -> Value {
    let count = results.len();
    json!({
        "results": results,
        "info": { "seed": "abc", "results": count, "page": 1, "version": "1.4" }
    })
}

async fn mount(server: &MockServer, count: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("results", count))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_single_profile() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("results", "1"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![user("jroe", 30, "female")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let profiles = client.fetch_profiles(1).await.unwrap();

    assert_eq!(profiles.len(), 1);
    let profile = &profiles[0];
    assert_eq!(profile.username(), "jroe");
    assert_eq!(profile.full_name(), "Jane Roe");
    assert_eq!(profile.full_address(), "4242 Elm Street, Billings, United States");
    assert_eq!(profile.theme(), ProfileTheme::Female);
    let point = profile.geo_point().unwrap();
    assert!((point.latitude - 45.7833).abs() < 1e-9);
    assert!((point.longitude + 108.5007).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_gallery_batch() {
    let (server, client) = setup().await;
    let users = (0..12).map(|i| user(&format!("u{}", i), 20 + i, "male")).collect();
    mount(&server, "12", ResponseTemplate::new(200).set_body_json(envelope(users))).await;

    let profiles = client.fetch_profiles(12).await.unwrap();

    assert_eq!(profiles.len(), 12);
    assert_eq!(profiles[11].username(), "u11");
    assert_eq!(profiles[0].theme(), ProfileTheme::Young);
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_count_mismatch() {
    let (server, client) = setup().await;
    let users = vec![user("a", 30, "male"), user("b", 30, "male")];
    mount(&server, "5", ResponseTemplate::new(200).set_body_json(envelope(users))).await;

    let err = client.fetch_profiles(5).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::CountMismatch {
            requested: 5,
            received: 2
        }
    ));
}

#[tokio::test]
async fn test_status_mapping() {
    let cases: [(u16, &str); 5] = [
        (403, "403"),
        (404, "404"),
        (429, "429"),
        (503, "503"),
        (418, "418"),
    ];

    for (status, label) in cases {
        let (server, client) = setup().await;
        mount(
            &server,
            "1",
            ResponseTemplate::new(status).set_body_string(format!("error {}", label)),
        )
        .await;

        let err = client.fetch_profiles(1).await.unwrap_err();
        match status {
            403 => assert!(matches!(err, ApiError::AccessDenied(ref b) if b.contains("error 403"))),
            404 => assert!(matches!(err, ApiError::NotFound(_))),
            429 => assert!(matches!(err, ApiError::RateLimited)),
            503 => assert!(matches!(err, ApiError::ServerError(ref b) if b.contains("error 503"))),
            _ => assert!(matches!(err, ApiError::InvalidResponse(ref m) if m.contains("418"))),
        }
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;
    mount(
        &server,
        "1",
        ResponseTemplate::new(200).set_body_string("{\"results\": [{\"login\": 7}]}"),
    )
    .await;

    let err = client.fetch_profiles(1).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(ref m) if m.contains("results")));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 1
    let client = ApiClient::with_base_url("http://127.0.0.1:1/api/", Duration::from_secs(2)).unwrap();

    let err = client.fetch_profiles(1).await.unwrap_err();

    assert!(matches!(err, ApiError::NetworkError(_)));
}

// ── Cache over HTTP ─────────────────────────────────────────────────

#[tokio::test]
async fn test_cache_persists_fetched_profile_to_disk() {
    let (server, client) = setup().await;
    mount(
        &server,
        "1",
        ResponseTemplate::new(200).set_body_json(envelope(vec![user("disk", 61, "male")])),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());
    let cache = ProfileCache::new(client.clone(), Arc::clone(&store));

    let profile = cache.get_current_profile().await.unwrap();
    assert_eq!(profile.username(), "disk");
    assert_eq!(profile.theme(), ProfileTheme::Elder);

    let reopened = ProfileCache::new(client, Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap()));
    assert_eq!(reopened.peek().map(|p| p.login.username), Some("disk".to_string()));
    assert!(reopened.entry().unwrap().is_fresh(reopened.freshness()));
}

#[tokio::test]
async fn test_cache_surfaces_server_failure() {
    let (server, client) = setup().await;
    mount(&server, "1", ResponseTemplate::new(500).set_body_string("oops")).await;

    let dir = tempfile::tempdir().unwrap();
    let cache = ProfileCache::new(client, Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap()));

    let err = cache.get_current_profile().await.unwrap_err();

    assert!(matches!(err, CoreError::FetchFailed(_)));
    assert_eq!(err.user_message(), "Failed to fetch user data");
    assert!(cache.peek().is_none());
}
