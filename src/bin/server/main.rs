#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for composing and sending email replies

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use reply_desk::{
    domain::{
        delivery::DispatcherImpl,
        replies::{ReplyComposerImpl, TextGenerationProvider},
    },
    infrastructure::{
        config::{ProviderConfig, SecretStore, SecretsConfig, SmtpConfig},
        email::smtp::SmtpRelay,
        http::{state::AppState, HttpServer, HttpServerConfig},
        llm::openai::OpenAiProvider,
    },
};
use tracing::{info, warn};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The text generation provider configuration
    #[clap(flatten)]
    pub provider: ProviderConfig,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// Where secrets are read from
    #[clap(flatten)]
    pub secrets: SecretsConfig,
}

fn composer<P: TextGenerationProvider>(
    provider: Option<P>,
    config: &ProviderConfig,
) -> ReplyComposerImpl<P> {
    match provider {
        Some(provider) => {
            info!(model = %config.model, "replies are generated by the language model");
            ReplyComposerImpl::new(Arc::new(provider), config.composer_config())
        }
        None => {
            warn!("no OpenAI API key found, replies use the offline fallback");
            ReplyComposerImpl::without_provider(config.composer_config())
        }
    }
}

fn dispatcher(config: &SmtpConfig) -> DispatcherImpl {
    match config.relay_config() {
        Some(relay) => {
            info!(host = %relay.host, port = relay.port, "replies are sent through SMTP");
            if !relay.starttls {
                warn!("STARTTLS is disabled, SMTP credentials travel unencrypted");
            }
            DispatcherImpl::new(
                Arc::new(SmtpRelay::new(relay)),
                config.dispatcher_config(),
            )
        }
        None => {
            warn!("no SMTP host configured, reply delivery is simulated");
            DispatcherImpl::simulate_only(config.dispatcher_config())
        }
    }
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let secrets = SecretStore::load(&args.secrets.secrets_file)?;

    let provider = args
        .provider
        .resolve_api_key(&secrets)
        .map(|key| OpenAiProvider::new(&args.provider.base_url, key));

    let state = AppState::new(
        composer(provider, &args.provider),
        dispatcher(&args.smtp),
    );

    HttpServer::new(args.server, state).await?.run().await
}
