use std::time::Duration;

use linkmint_core::ShortCode;
use linkmint_storage::{LinkStore, MySqlLinkStore, NewLink, StorageError};
use linkmint_test_infra::mysql::{MySqlOptions, MySqlServer};

struct Fixture {
    _mysql: MySqlServer,
    store: MySqlLinkStore,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::start(MySqlOptions::default())
            .await
            .expect("start mysql");
        let store = MySqlLinkStore::connect(mysql.database_url(), Duration::from_secs(5))
            .await
            .expect("connect mysql");
        store.ensure_schema().await.expect("create schema");

        Self {
            _mysql: mysql,
            store,
        }
    }
}

fn new_link(url: &str, code: &str) -> NewLink {
    NewLink {
        original_url: url.to_string(),
        short_code: ShortCode::new_unchecked(code),
    }
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn create_then_find_by_code_and_url() {
    let fixture = Fixture::start().await;

    let created = fixture
        .store
        .create(new_link("https://example.com/a", "Xk9p2Q"))
        .await
        .unwrap();

    let by_code = fixture
        .store
        .find_by_code(&ShortCode::new_unchecked("Xk9p2Q"))
        .await
        .unwrap()
        .unwrap();
    let by_url = fixture
        .store
        .find_by_url("https://example.com/a")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(by_code, created);
    assert_eq!(by_url, created);
    assert!(fixture
        .store
        .exists(&ShortCode::new_unchecked("Xk9p2Q"))
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn duplicate_code_reports_code_conflict() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(new_link("https://one.example/", "abc123"))
        .await
        .unwrap();

    let err = fixture
        .store
        .create(new_link("https://two.example/", "abc123"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::CodeConflict(_)));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn duplicate_url_reports_url_conflict() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(new_link("https://one.example/", "abc123"))
        .await
        .unwrap();

    let err = fixture
        .store
        .create(new_link("https://one.example/", "xyz789"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::UrlConflict(_)));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn list_returns_newest_first() {
    let fixture = Fixture::start().await;

    for i in 0..3 {
        fixture
            .store
            .create(new_link(&format!("https://example{i}.com/"), &format!("code{i}")))
            .await
            .unwrap();
    }

    let links = fixture.store.list(2).await.unwrap();
    let codes: Vec<&str> = links.iter().map(|l| l.short_code.as_str()).collect();
    assert_eq!(codes, vec!["code2", "code1"]);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn first_connect_after_start_succeeds() {
    let mysql = MySqlServer::start(MySqlOptions::default())
        .await
        .expect("start mysql");

    let store = MySqlLinkStore::connect(mysql.database_url(), Duration::from_secs(1))
        .await
        .expect("server accepts connections as soon as start returns");
    let one: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(store.pool())
        .await
        .expect("select 1");

    assert_eq!(one, 1);
}
