use crate::api;
use crate::client::UpstreamClient;
use crate::config::Config;
use crate::errors::{CatalogError, ErrorPage, Result};
use crate::metrics_defs::{ALL_METRICS, REQUEST_DURATION};
use crate::pages;
use crate::resources::CatalogApi;
use crate::templates::Templates;
use axum::Router;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use serde::Serialize;
use shared::admin_service::AdminService;
use shared::http::{make_error_response, run_http_service};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

struct AppStateInner {
    api: CatalogApi,
    templates: Templates,
    resident_concurrency: usize,
}

/// Everything a request handler needs, shared by all requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub fn try_new(config: &Config) -> Result<Self> {
        let client = UpstreamClient::new(config.upstream.timeout())?;

        Ok(AppState {
            inner: Arc::new(AppStateInner {
                api: CatalogApi::new(client, &config.upstream),
                templates: Templates::load()?,
                resident_concurrency: config.residents.max_concurrency,
            }),
        })
    }

    pub fn api(&self) -> &CatalogApi {
        &self.inner.api
    }

    pub fn resident_concurrency(&self) -> usize {
        self.inner.resident_concurrency
    }

    pub fn render<S: Serialize>(&self, template: &str, context: S) -> Result<Html<String>> {
        Ok(Html(self.inner.templates.render(template, context)?))
    }
}

/// Builds the public router: JSON pass-through under `/api`, HTML pages
/// everywhere else, and the error page for anything that fails or does not
/// match.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .nest("/api", api::router())
        .merge(pages::router())
        .fallback(not_found);
    with_layers(routes, state)
}

fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(CatchPanicLayer::custom(handler_panicked))
        .layer(middleware::from_fn_with_state(state.clone(), render_error_page))
        .layer(middleware::from_fn(record_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> CatalogError {
    CatalogError::RouteNotFound
}

fn handler_panicked(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };
    CatalogError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Turns the [`ErrorPage`] marker left by a failed handler into the rendered
/// error template.
async fn render_error_page(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    let rendered = state.inner.templates.render(
        "erro.html",
        context! { message => page.message, status => page.status.as_u16() },
    );

    match rendered {
        Ok(html) => (page.status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "could not render error page");
            make_error_response(page.status).into_response()
        }
    }
}

async fn record_request(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    shared::histogram!(
        REQUEST_DURATION,
        "route" => route,
        "status" => response.status().as_u16().to_string(),
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// The catalog front-end: a public listener for pages and JSON, and an admin
/// listener for probes.
pub struct Server {
    config: Config,
    state: AppState,
    ready: Arc<AtomicBool>,
}

impl Server {
    pub fn new(config: Config) -> Result<Self> {
        let state = AppState::try_new(&config)?;
        shared::metrics_defs::describe_all(ALL_METRICS);

        Ok(Server {
            config,
            state,
            ready: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Serves until Ctrl-C. The public listener drains in-flight requests
    /// before returning.
    pub async fn serve(self) -> Result<()> {
        let Server {
            config,
            state,
            ready,
        } = self;

        let listener = TcpListener::bind(config.listener.address()).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            upstream = %config.upstream.url,
            "listening"
        );

        let probe = ready.clone();
        let admin = AdminService::new(move || probe.load(Ordering::Relaxed));
        let admin_task = run_http_service(
            &config.admin_listener.host,
            config.admin_listener.port,
            admin,
        );

        let app = build_router(state);
        ready.store(true, Ordering::Relaxed);
        let public_task = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        tokio::select! {
            result = public_task => result?,
            result = admin_task => result?,
        }

        tracing::info!("shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
