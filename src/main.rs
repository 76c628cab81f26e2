//! Graph Bridge entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use graph_bridge::application::{Bridge, RunStatus, FALLBACK_MESSAGE};
use graph_bridge::cli::Cli;
use graph_bridge::domain::models::{ChannelConfig, Config, Envelope, TransportKind};
use graph_bridge::domain::ports::Transport;
use graph_bridge::infrastructure::logging::{scrub, LoggerImpl};
use graph_bridge::infrastructure::openai::OpenAiEngineProvider;
use graph_bridge::infrastructure::transport::{SocketTransport, StdioTransport};

const EXIT_RUN_FAILED: u8 = 1;
const EXIT_CONFIG_FAILED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Strictly one request at a time; a single thread is all the run needs.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("graph-bridge: failed to start async runtime: {err}");
            return ExitCode::from(EXIT_RUN_FAILED);
        }
    };

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> ExitCode {
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("graph-bridge: {err:#}");
            report_startup_failure(&err).await;
            return ExitCode::from(EXIT_CONFIG_FAILED);
        }
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("graph-bridge: logging disabled: {err:#}");
            None
        }
    };

    match serve(&config).await {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Failed) => ExitCode::from(EXIT_RUN_FAILED),
        Err(err) => {
            error!(error = %format!("{err:#}"), "bridge could not deliver its reply");
            ExitCode::from(EXIT_RUN_FAILED)
        }
    }
}

async fn serve(config: &Config) -> Result<RunStatus> {
    let provider = OpenAiEngineProvider::new(
        config.agent.clone(),
        config.provider.clone(),
        config.retry.clone(),
    );
    let bridge = Bridge::new(provider, config.agent.clone());

    let mut transport: Box<dyn Transport> = match config.transport.kind {
        TransportKind::Stdio => Box::new(StdioTransport::stdio(&config.channel)),
        TransportKind::Socket => {
            let host = config.transport.host.as_deref().unwrap_or_default();
            let port = config.transport.port.unwrap_or_default();
            Box::new(
                SocketTransport::connect(host, port)
                    .await
                    .with_context(|| format!("Failed to connect to host at {host}:{port}"))?,
            )
        }
    };

    Ok(bridge.run(transport.as_mut()).await?)
}

/// The host is blocked on stdout; even a bad configuration must answer it.
async fn report_startup_failure(err: &anyhow::Error) {
    let envelope = Envelope::Error {
        error: scrub(&format!("{err:#}")),
        message: FALLBACK_MESSAGE.to_string(),
    };
    let mut transport = StdioTransport::stdio(&ChannelConfig::default());
    if let Err(send_err) = transport.send(&envelope).await {
        eprintln!("graph-bridge: failed to report startup failure: {send_err}");
    }
}
