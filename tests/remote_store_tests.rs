use openscience_stats::store::RemoteStore;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn amy() -> serde_json::Value {
    serde_json::json!({
        "ENID": 42,
        "firstName": "Amy",
        "lastName": "Lee",
        "email": "Amy.Lee@example.org"
    })
}

#[tokio::test]
async fn test_bulk_reads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([amy()])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "doi": "10.1/a",
                "name": "A",
                "date": "2020-01-01",
                "authors": "Lee, Amy",
                "citations": 2,
                "supplementary": {"data": {"geo": ["GSE1"]}}
            }
        ])))
        .mount(&mock_server)
        .await;

    let store = RemoteStore::new(format!("{}/", mock_server.uri()), 5).unwrap();

    let authors = store.authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].enid, 42);

    let pubs = store.publications().await.unwrap();
    assert_eq!(pubs.len(), 1);
    assert_eq!(pubs[0].links("data", "geo"), ["GSE1".to_string()]);
}

#[tokio::test]
async fn test_author_by_email_matches_case_insensitively() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authors"))
        .and(query_param("email", "amy.lee@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([amy()])))
        .mount(&mock_server)
        .await;

    let store = RemoteStore::new(mock_server.uri(), 5).unwrap();

    let found = store.author_by_email("amy.lee@example.org").await.unwrap();
    assert_eq!(found.map(|a| a.enid), Some(42));
}

#[tokio::test]
async fn test_author_by_enid_404_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authors/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(amy()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/authors/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let store = RemoteStore::new(mock_server.uri(), 5).unwrap();

    let found = store.author_by_enid(42).await.unwrap();
    assert_eq!(found.map(|a| a.last_name), Some("Lee".to_string()));
    assert!(store.author_by_enid(7).await.unwrap().is_none());
}

#[tokio::test]
async fn test_retry_on_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authors"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/authors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([amy()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = RemoteStore::new(mock_server.uri(), 5).unwrap();

    let authors = store.authors().await.unwrap();
    assert_eq!(authors.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_storage_fault() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let store = RemoteStore::new(mock_server.uri(), 5).unwrap();

    let err = store.publications().await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_missing_collection_is_storage_fault() {
    let mock_server = MockServer::start().await;

    let store = RemoteStore::new(mock_server.uri(), 5).unwrap();

    // wiremock answers unmatched requests with 404
    let err = store.authors().await.unwrap_err();
    assert!(err.to_string().contains("404"));
}
