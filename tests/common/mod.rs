#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

use dailyquotes::prefs::PrefsStore;
use dailyquotes::quotes::QuoteClient;
use dailyquotes::reminder::{Notifier, ReminderScheduler};
use dailyquotes::screens::QuoteScreen;
use dailyquotes::share::ShareGateway;
use dailyquotes::store::ReflectionStore;
use dailyquotes::AppState;

pub const QUOTE_JSON: &str =
    r#"[{"q":"The obstacle is the way.","a":"Marcus Aurelius","h":"<blockquote>The obstacle is the way.</blockquote>"}]"#;

#[derive(Default)]
pub struct RecordingShare {
    pub shared: Mutex<Vec<String>>,
}

impl ShareGateway for RecordingShare {
    fn share_text(&self, text: &str) {
        self.shared.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub denied: AtomicBool,
    pub delivered: AtomicUsize,
}

impl Notifier for RecordingNotifier {
    fn is_permitted(&self) -> bool {
        !self.denied.load(Ordering::SeqCst)
    }

    fn notify(&self, _title: &str, _body: &str) {
        self.delivered.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory SQLite pool with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Serve `body` with `status` at `/api/today` on a random local port and
/// return the endpoint URL.
pub async fn spawn_quote_api(status: StatusCode, body: &'static str) -> Url {
    let app = Router::new().route("/api/today", get(move || async move { (status, body) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api/today")).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub store: ReflectionStore,
    pub quote: QuoteScreen,
    pub share: Arc<RecordingShare>,
    pub notifier: Arc<RecordingNotifier>,
    pub prefs: PrefsStore,
    _prefs_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_quote_api(StatusCode::OK, QUOTE_JSON).await
    }

    pub async fn with_quote_api(status: StatusCode, body: &'static str) -> Self {
        Self::build(spawn_quote_api(status, body).await, RecordingNotifier::default()).await
    }

    pub async fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(spawn_quote_api(StatusCode::OK, QUOTE_JSON).await, notifier).await
    }

    async fn build(quote_url: Url, notifier: RecordingNotifier) -> Self {
        let db = test_pool().await;
        let store = ReflectionStore::new(db.clone());
        let quote = QuoteScreen::new(QuoteClient::new(quote_url, Duration::from_secs(5)).unwrap());
        let share = Arc::new(RecordingShare::default());
        let notifier = Arc::new(notifier);
        let prefs_dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::new(prefs_dir.path().join("prefs.json"));

        let state = AppState {
            store: store.clone(),
            quote: quote.clone(),
            reminders: Arc::new(ReminderScheduler::new(notifier.clone(), prefs.clone())),
            share: share.clone(),
        };
        let router = dailyquotes::build_app(state);

        Self {
            router,
            db,
            store,
            quote,
            share,
            notifier,
            prefs,
            _prefs_dir: prefs_dir,
        }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: serde_json::Value) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method(method)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response {
        self.send_json("POST", uri, body).await
    }

    pub async fn post_empty(&self, uri: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("DELETE")
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    /// Save a reflection through the API and return its id.
    pub async fn create_reflection(&self, note: &str, tags: &[&str]) -> i64 {
        let resp = self
            .post_json(
                "/reflections",
                serde_json::json!({
                    "quote_content": "The obstacle is the way.",
                    "author": "Marcus Aurelius",
                    "note": note,
                    "tags": tags,
                }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["id"].as_i64().unwrap()
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}
