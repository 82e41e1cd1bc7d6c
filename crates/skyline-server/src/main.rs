use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skyline_dispatch::transport::{MailTransport, SmtpMailer};
use skyline_server::config::ServiceConfig;
use skyline_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServiceConfig::from_env()?;

    let mailer = SmtpMailer::new(&config.smtp)?;
    match mailer.verify().await {
        Ok(()) => info!(host = %config.smtp.host, "mail server is ready"),
        Err(e) => warn!(error = %e, host = %config.smtp.host, "mail server verification failed"),
    }

    let state = AppState::new(
        config.build_renderer(),
        Arc::new(mailer),
        config.dispatch.clone(),
        config.limits,
    );
    let app = skyline_server::app(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        info!(strategy = %config.strategy, "starting lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, strategy = %config.strategy, "server running");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
