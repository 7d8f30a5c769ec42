use std::{future::Future, future::IntoFuture, pin::Pin, sync::Arc};

use anyhow::Context;
use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::{
    appstate::AppState,
    configuration::Settings,
    mailer::{Mailer, SmtpMailer},
    routes::{health_check, not_found, send_ride_request},
};

type Server = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Binds the listener and wires the SMTP mailer described by `configuration`.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let mailer = SmtpMailer::from_settings(&configuration.smtp)
            .context("Failed to build the SMTP mailer")?;
        Self::build_with_mailer(configuration, Arc::new(mailer)).await
    }

    /// Same as [`Application::build`] with any [`Mailer`] doing the delivery.
    pub async fn build_with_mailer(
        configuration: Settings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, anyhow::Error> {
        let addr = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let port = listener
            .local_addr()
            .context("Failed to read the bound address")?
            .port();

        let server = run(listener, AppState::new(mailer));

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/api/mail", post(send_ride_request))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(default_span)
                    .on_request(DefaultOnRequest::new())
                    .on_response(DefaultOnResponse::new())
                    .on_failure(DefaultOnFailure::new()),
            ),
        )
        .with_state(app_state)
}

pub fn run(listener: TcpListener, app_state: AppState) -> Server {
    let server = axum::serve(listener, app(app_state)).with_graceful_shutdown(shutdown_signal());
    Box::pin(server.into_future())
}

fn default_span(request: &Request<Body>) -> tracing::Span {
    let request_id = uuid::Uuid::new_v4();
    tracing::span!(
        Level::INFO,
        "request",
        method = tracing::field::display(request.method()),
        uri = tracing::field::display(request.uri()),
        version = tracing::field::debug(request.version()),
        request_id = tracing::field::display(request_id),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}
