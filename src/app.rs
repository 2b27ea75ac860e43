use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, MethodRouter},
    Extension, Router,
};
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use axum_server::tls_rustls::RustlsConfig;
use axum_test::{transport_layer::IntoTransportLayer, TestServer};
use rust_embed::RustEmbed;
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use std::{env, net::SocketAddr, sync::OnceLock};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{
        self,
        format::{Format, JsonFields},
    },
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{cors::cors, fallback::FallbackCounter, routes};

// The recorder is process global, so the layer and handle are built once and shared by every App.
static METRICS: OnceLock<(PrometheusMetricLayer<'static>, PrometheusHandle)> = OnceLock::new();

#[derive(Default)]
pub struct App {
    router: Router,
}

impl App {
    pub fn new() -> Self {
        // May not know if app is constructed before the store, so trigger dotenvs in both situations
        dotenvy::dotenv().ok();
        logger();
        let mut app = Self::default();
        let (_, metric_printer) = metrics();
        app.router = Router::new()
            .route("/status/liveness", get(|| async { "".into_response() }))
            .route(
                "/metrics/prometheus",
                get(|| async move { metric_printer.render() }),
            );
        app
    }

    pub async fn start(self) -> anyhow::Result<()> {
        start(self.into_router()).await
    }

    /// Mounts the counter endpoints and injects the counter they share.
    pub fn counter(self, counter: FallbackCounter) -> Self {
        Self {
            router: self.router.merge(routes::counts().layer(Extension(counter))),
        }
    }

    /// Serves every embedded file at `/<file>`, typed by its extension.
    pub fn statics<T: RustEmbed>(self) -> Self {
        let mut app = self;
        for file in T::iter() {
            let file = file.as_ref();
            let Some(asset) = T::get(file) else {
                warn!(file, "Embedded file listed but not found");
                continue;
            };
            let bytes = asset.data.to_vec();
            let mime = mime_guess::from_path(file).first_raw().unwrap_or("");
            app = Self {
                router: app.router.route(
                    format!("/{}", file).as_str(),
                    get(|| async { ([("Content-Type", mime.to_owned())], bytes).into_response() }),
                ),
            };
        }
        app
    }

    pub fn route(self, path: &str, method_router: MethodRouter<()>) -> Self {
        let mut app = self;
        app.router = app.router.route(path, method_router);
        app
    }

    /// Final router: unknown paths answer the JSON 404, every route is measured
    /// and every response passes through the CORS middleware.
    pub fn into_router(self) -> Router {
        let (metric_gatherer, _) = metrics();
        self.router
            .fallback(routes::not_found)
            .layer(metric_gatherer)
            .layer(middleware::from_fn(cors))
    }

    pub fn as_test_server(self) -> TestServer {
        TestServer::new(self).expect("test server")
    }
}

impl IntoTransportLayer for App {
    fn into_http_transport_layer(
        self,
        builder: axum_test::transport_layer::TransportLayerBuilder,
    ) -> anyhow::Result<Box<dyn axum_test::transport_layer::TransportLayer>> {
        self.into_router().into_http_transport_layer(builder)
    }

    fn into_mock_transport_layer(
        self,
    ) -> anyhow::Result<Box<dyn axum_test::transport_layer::TransportLayer>> {
        self.into_router().into_mock_transport_layer()
    }
}

async fn start(app: Router) -> anyhow::Result<()> {
    let _guard = sentry();
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let app = app
        .layer(NewSentryLayer::new_from_top())
        .layer(SentryHttpLayer::with_transaction())
        .layer(compression_layer);

    let bind = env::var("SERVER_BIND").unwrap_or("0.0.0.0".into());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    if env::var("TLS").is_ok() {
        let pem_cert = env::var("TLS_PEM_CERT")?;
        let pem_key = env::var("TLS_PEM_KEY")?;
        info!("Starting server on {bind}:{port} with TLS ON");
        let tls_config = RustlsConfig::from_pem_file(pem_cert, pem_key).await?;
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?
    } else {
        info!("Starting server on {bind}:{port}");
        axum::serve(TcpListener::bind(addr).await?, app).await?;
    }
    Ok(())
}

fn sentry() -> Option<sentry::ClientInitGuard> {
    if let Ok(url) = env::var("SENTRY_URL") {
        return Some(sentry::init((
            url,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        )));
    }
    None
}

pub(crate) fn logger() {
    let enabled: bool = env::var("STRUCTURED_LOGGING")
        .map(|s| s.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);
    if enabled {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .event_format(Format::default().json())
                    .fmt_fields(JsonFields::new()),
            )
            .with(EnvFilter::from_default_env())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .try_init()
            .ok();
    };
}

fn metrics() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    METRICS.get_or_init(PrometheusMetricLayer::pair).clone()
}
