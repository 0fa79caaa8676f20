#![allow(dead_code)]

use axum_test::TestServer;
use shorten::application::services::{KeyPolicy, ShortenService};
use shorten::config::NotFoundPolicy;
use shorten::domain::repositories::UrlRepository;
use shorten::infrastructure::persistence::MemoryUrlRepository;
use shorten::routes::app_router;
use shorten::state::{AppState, HttpSettings};
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const BASE_URL: &str = "https://s.example.com";

/// Directory without a `public/` folder; static requests answer 404.
pub const NO_STATIC: &str = "./target/no-static";

pub fn http_settings(base_path: &str, not_found_policy: NotFoundPolicy) -> HttpSettings {
    HttpSettings {
        base_path: base_path.to_string(),
        base_url: BASE_URL.to_string(),
        not_found_policy,
    }
}

pub fn create_state_with(
    repository: Arc<dyn UrlRepository>,
    policy: KeyPolicy,
    http: HttpSettings,
) -> AppState {
    let service = Arc::new(ShortenService::new(repository, policy, 3));
    AppState::new(service, http)
}

/// State over a fresh in-memory registry with default policies.
pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repo = Arc::new(MemoryUrlRepository::new());
    let state = create_state_with(
        repo.clone(),
        KeyPolicy::default(),
        http_settings("/", NotFoundPolicy::Redirect),
    );
    (state, repo)
}

/// Full application router wrapped in a test server.
pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state, NO_STATIC)).unwrap()
}

/// Connects to `TEST_DATABASE_URL` and applies migrations.
///
/// Returns `None` (and the test passes vacuously) when the variable is unset.
pub async fn postgres_or_skip() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("Skipping PostgreSQL test (TEST_DATABASE_URL not set)");
        return None;
    };

    let pool = PgPool::connect(&url)
        .await
        .unwrap_or_else(|e| panic!("PostgreSQL test setup failed: {e}"));
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    Some(pool)
}

/// A URL no earlier test run has registered.
pub fn unique_url(tag: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("https://pg-test.example/{tag}/{nanos}-{n}")
}
