//! Command-line configuration.
//!
//! ```text
//! Cli
//! ├── storage: MinossConfig   # endpoint, credentials, bucket, region, timeouts
//! └── command: Command        # the operation to run
//! ```
//!
//! Connection settings can be given as flags or `MINOSS_*` environment
//! variables:
//!
//! ```bash
//! minoss --endpoint play.min.io --secure --access-key ... --secret-key ... buckets
//! MINOSS_ENDPOINT=localhost:9000 minoss usage details
//! ```

use std::process;

use clap::Parser;
use minoss::MinossConfig;

use crate::TRACING_TARGET_STARTUP;
use crate::command::Command;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "minoss")]
#[command(about = "Object storage and MinIO administration from the command line")]
#[command(version)]
pub struct Cli {
    /// Connection settings.
    #[clap(flatten)]
    pub storage: MinossConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads `.env` (when enabled) and parses the command line.
    ///
    /// The `.env` file is read first so its variables act as defaults for
    /// the `env` fallbacks of every flag.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs build information and the connection settings, without secrets.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            endpoint = %self.storage.endpoint_masked(),
            access_key = %self.storage.credentials().access_key_masked(),
            bucket = ?self.storage.bucket(),
            region = %self.storage.region,
            connect_timeout_secs = self.storage.connect_timeout_secs,
            request_timeout_secs = self.storage.request_timeout_secs,
            command = self.command.name(),
            "Storage configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
