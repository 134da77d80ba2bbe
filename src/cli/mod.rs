//! CLI commands for whatsrelay using clap.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{self, load_settings_or_default, Settings};
use crate::session::WhatsAppClientFactory;
use crate::state::AppState;

/// whatsrelay - Multi-tenant WhatsApp auto-responder.
#[derive(Parser)]
#[command(name = "whatsrelay")]
#[command(version = "0.1.0")]
#[command(about = "Relay incoming WhatsApp chats to AI-generated replies", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the relay server
    Serve {
        /// Listen port (overrides settings)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default settings file
    Setup,
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Serve { port } => cmd_serve(port).await,
            Command::Setup => cmd_setup(),
        }
    }
}

async fn cmd_serve(port: Option<u16>) -> Result<()> {
    let mut settings = load_settings_or_default();
    if let Some(port) = port {
        settings.server.port = port;
    }

    if settings.registration.resolve_secret().is_none() {
        tracing::warn!("No registration secret configured; /register is disabled");
    }

    let provider = crate::providers::get_current_provider(&settings);
    if !provider.is_available().await {
        tracing::warn!(
            "Provider {} is not configured; replies will degrade to error sentinels",
            provider.name()
        );
    }

    let state = Arc::new(
        AppState::new(settings, Arc::new(WhatsAppClientFactory))
            .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?,
    );

    crate::web::run_web_server(state)
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))
}

fn cmd_setup() -> Result<()> {
    let path = config::get_settings_path()?;
    if path.exists() {
        println!("Settings already exist at {}", path.display());
        return Ok(());
    }

    config::save_settings(&Settings::default())?;
    println!("Wrote default settings to {}", path.display());
    println!("Set registration.secret (or REGISTER_SECRET) and models.cohere.api_key (or CO_API_KEY) before serving.");
    Ok(())
}
