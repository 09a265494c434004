//! `docxgen serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use docxgen_config::{CliSettings, Config, Environment};
use docxgen_server::{StoreConfig, run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover docxgen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Run in development mode (error details in responses).
    #[arg(long)]
    dev: bool,

    /// Enable verbose output (log every produced document).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            environment: self.dev.then_some(Environment::Development),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config)?;

        let storage = match &server_config.storage {
            StoreConfig::S3(s3) => format!("s3://{}", s3.bucket),
            StoreConfig::Fs { root, .. } => root.display().to_string(),
        };
        output.serving(
            &format!("{}:{}", server_config.host, server_config.port),
            &storage,
            server_config.expose_error_details,
        );

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
