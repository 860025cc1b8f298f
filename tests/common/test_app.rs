use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use planetary::config::ServerConfig;
use planetary::server::{AppState, create_router};
use planetary::store::{SqliteStore, Store};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// The API router over a fresh database, driven in-process.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_source("http://127.0.0.1:9/unused")
    }

    pub fn with_source(source_url: &str) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = ServerConfig {
            data_dir: temp_dir.path().to_path_buf(),
            source_url: source_url.to_string(),
            ..ServerConfig::default()
        };

        let store = Arc::new(SqliteStore::new(config.db_path()).expect("open store"));
        store.initialize().expect("initialize store");

        let state = AppState::new(store.clone(), &config).expect("build state");
        let router = create_router(Arc::new(state));

        Self {
            temp_dir,
            store,
            router,
        }
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.raw(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Registers a user and returns a ready-to-use `Authorization` header value.
    pub async fn login(&self, username: &str) -> String {
        let credentials = json!({"username": username, "password": "use-the-force"});

        let (status, _) = self
            .request(Method::POST, "/api/register/", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .request(Method::POST, "/api/api-token-auth/", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);

        let token = body["data"]["token"].as_str().expect("token in response");
        format!("Token {token}")
    }

    pub async fn create_planet(&self, auth: &str, planet: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/api/planets/create/", Some(auth), Some(planet))
            .await
    }
}

/// A stand-in for the SWAPI GraphQL endpoint that answers every POST with a
/// fixed status and body.
pub struct FakeSource {
    pub url: String,
    handle: JoinHandle<()>,
}

impl FakeSource {
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let app = Router::new().route(
            "/graphql",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake source");
        });

        Self {
            url: format!("http://{addr}/graphql"),
            handle,
        }
    }

    pub fn planets(planets: Value) -> Value {
        json!({ "data": { "allPlanets": { "planets": planets } } })
    }
}

impl Drop for FakeSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/graphql")
}
