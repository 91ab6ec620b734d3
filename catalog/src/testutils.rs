use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A canned answer for one path-and-query of the fake catalog API.
pub struct Fixture {
    path: String,
    body: FixtureBody,
    delay: Duration,
}

enum FixtureBody {
    Json(Value),
    Raw(&'static str),
}

impl Fixture {
    pub fn json(path: &str, body: Value) -> Self {
        Fixture {
            path: path.to_string(),
            body: FixtureBody::Json(body),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(path: &str, body: &'static str) -> Self {
        Fixture {
            path: path.to_string(),
            body: FixtureBody::Raw(body),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct FakeState {
    fixtures: HashMap<String, Fixture>,
    hits: Mutex<Vec<String>>,
}

/// In-process stand-in for the catalog API, bound to an ephemeral port.
///
/// Unknown paths answer 404 with the API's error document.
pub struct FakeUpstream {
    base_url: String,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeUpstream {
    /// `fixtures` receives the API base URL (`http://127.0.0.1:<port>/api`) so
    /// records can reference each other by absolute URL.
    pub async fn spawn<F>(fixtures: F) -> Self
    where
        F: FnOnce(&str) -> Vec<Fixture>,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}/api");

        let state = Arc::new(FakeState {
            fixtures: fixtures(&base_url)
                .into_iter()
                .map(|f| (f.path.clone(), f))
                .collect(),
            hits: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(serve_fixture)
            .with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeUpstream {
            base_url,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    /// Absolute URL for a path such as `/api/character/1`.
    pub fn url(&self, path: &str) -> String {
        let origin = self.base_url.trim_end_matches("/api");
        format!("{origin}{path}")
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.state.hits.lock().unwrap().clone()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_fixture(State(state): State<Arc<FakeState>>, uri: Uri) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.hits.lock().unwrap().push(key.clone());

    let Some(fixture) = state.fixtures.get(&key) else {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"error": "There is nothing here"})),
        )
            .into_response();
    };

    if !fixture.delay.is_zero() {
        tokio::time::sleep(fixture.delay).await;
    }

    match &fixture.body {
        FixtureBody::Json(value) => axum::Json(value.clone()).into_response(),
        FixtureBody::Raw(body) => ([(header::CONTENT_TYPE, "text/html")], *body).into_response(),
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

/// A character record shaped like the catalog API's.
pub fn character(base: &str, id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": {"name": "unknown", "url": ""},
        "location": {"name": "unknown", "url": ""},
        "image": format!("{base}/character/avatar/{id}.jpeg"),
        "episode": [format!("{base}/episode/1")],
        "url": format!("{base}/character/{id}"),
        "created": "2017-11-04T18:48:46.250Z",
    })
}
