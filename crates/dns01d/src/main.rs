// # dns01d - DNS-01 Solver Harness
//
// This binary is a THIN integration layer over `dns01-core`. It carries no
// DNS or credential logic of its own.
//
// The dns01d binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Building the secret store and registering solvers
// 4. Running exactly one Present or CleanUp for a challenge request
//
// ## Configuration
//
// - `DNS01_GROUP_NAME`: API group the solvers are served under (required)
// - `DNS01_SOLVER`: Solver to route to (default: porkbun)
// - `DNS01_SECRETS_DIR`: Root of the `<namespace>/<name>/<key>` secret tree
//   (default: /var/run/secrets/dns01)
// - `DNS01_PROVIDER_BASE_URL`: Override of the provider API base URL
// - `DNS01_HTTP_TIMEOUT_SECS`: Provider HTTP timeout, 1..=300 (default: 30)
// - `DNS01_MODE`: `live` or `dry-run` (default: live)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DNS01_GROUP_NAME=acme.example.com
// export DNS01_SECRETS_DIR=/var/run/secrets/dns01
//
// dns01d present challenge.json
// cat challenge.json | dns01d cleanup -
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dns01_core::config::{ClientConfig, DEFAULT_HTTP_TIMEOUT_SECS};
use dns01_core::traits::SolverContext;
use dns01_core::{ChallengeRequest, DirSecretStore, SolverRegistry};
use std::env;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Default location of the mounted credential secrets
const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/dns01";

/// Default solver name
const DEFAULT_SOLVER: &str = "porkbun";

/// Exit codes for different termination scenarios
///
/// - 0: Challenge operation succeeded
/// - 1: Configuration or input error
/// - 2: Runtime error (provider, secret store)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dns01ExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or unreadable request
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// One-shot DNS-01 challenge harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure the challenge TXT record exists
    Present {
        /// Challenge request JSON file, or `-` for stdin
        request: String,
    },
    /// Ensure the challenge TXT record is gone
    Cleanup {
        /// Challenge request JSON file, or `-` for stdin
        request: String,
    },
}

impl Command {
    fn request_source(&self) -> &str {
        match self {
            Command::Present { request } | Command::Cleanup { request } => request,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Command::Present { .. } => "present",
            Command::Cleanup { .. } => "cleanup",
        }
    }
}

/// Harness configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    solver: String,
    secrets_dir: String,
    provider_base_url: Option<String>,
    http_timeout_secs: u64,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let http_timeout_secs = match lookup("DNS01_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("DNS01_HTTP_TIMEOUT_SECS must be an integer. Got: {}", raw)
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let dry_run = match lookup("DNS01_MODE").as_deref().map(str::to_lowercase) {
            None => false,
            Some(mode) if mode == "live" => false,
            Some(mode) if mode == "dry-run" => true,
            Some(other) => anyhow::bail!(
                "DNS01_MODE '{}' is not valid. Valid modes: live, dry-run",
                other
            ),
        };

        Ok(Self {
            group_name: lookup("DNS01_GROUP_NAME").unwrap_or_default(),
            solver: lookup("DNS01_SOLVER").unwrap_or_else(|| DEFAULT_SOLVER.to_string()),
            secrets_dir: lookup("DNS01_SECRETS_DIR")
                .unwrap_or_else(|| DEFAULT_SECRETS_DIR.to_string()),
            provider_base_url: lookup("DNS01_PROVIDER_BASE_URL").filter(|u| !u.is_empty()),
            http_timeout_secs,
            dry_run,
            log_level: lookup("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            anyhow::bail!(
                "DNS01_GROUP_NAME is required. \
                Set it via: export DNS01_GROUP_NAME=acme.example.com"
            );
        }

        if self.solver.is_empty() {
            anyhow::bail!("DNS01_SOLVER cannot be empty");
        }

        if self.secrets_dir.is_empty() {
            anyhow::bail!("DNS01_SECRETS_DIR cannot be empty");
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "DNS01_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        if let Some(ref url) = self.provider_base_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!(
                    "DNS01_PROVIDER_BASE_URL must use HTTP or HTTPS scheme. Got: {}",
                    url
                );
            }

            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: DNS01_PROVIDER_BASE_URL uses HTTP (not HTTPS). \
                    API keys will be sent in cleartext."
                );
            }
        }

        parse_log_level(&self.log_level)?;

        Ok(())
    }

    /// HTTP client settings handed to solvers
    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_timeout_secs(self.http_timeout_secs)
            .with_dry_run(self.dry_run);

        match &self.provider_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNS01_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Read and decode a challenge request from a file or stdin
fn read_request(source: &str) -> Result<ChallengeRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read challenge request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read challenge request from {}", source))?
    };

    parse_request(&raw)
}

fn parse_request(raw: &str) -> Result<ChallengeRequest> {
    let request: ChallengeRequest =
        serde_json::from_str(raw).context("Challenge request is not valid JSON")?;

    if request.resolved_fqdn.is_empty() || request.resolved_zone.is_empty() {
        anyhow::bail!("Challenge request must carry resolvedFQDN and resolvedZone");
    }

    Ok(request)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let request = match read_request(cli.command.request_source()) {
        Ok(request) => request,
        Err(e) => {
            error!("{:#}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(config, cli.command, request)).into()
}

/// Build the registry and run one challenge operation
async fn run(config: Config, command: Command, request: ChallengeRequest) -> Dns01ExitCode {
    info!(
        "dns01d {} for {} [mode: {}]",
        command.label(),
        request.fqdn(),
        if config.dry_run { "DRY-RUN" } else { "LIVE" }
    );

    let registry = match build_registry(&config).await {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to initialize solvers: {:#}", e);
            return Dns01ExitCode::ConfigError;
        }
    };

    let solver = match registry.route(&config.group_name, &config.solver) {
        Ok(solver) => solver,
        Err(e) => {
            error!("{}", e);
            return Dns01ExitCode::ConfigError;
        }
    };

    let result = match command {
        Command::Present { .. } => solver.present(&request).await,
        Command::Cleanup { .. } => solver.clean_up(&request).await,
    };

    match result {
        Ok(()) => {
            info!("{} completed for {}", command.label(), request.fqdn());
            Dns01ExitCode::Success
        }
        Err(e) => {
            if e.is_retryable() {
                warn!("{} failed (retryable): {}", command.label(), e);
            } else {
                error!("{} failed: {}", command.label(), e);
            }
            Dns01ExitCode::RuntimeError
        }
    }
}

/// Create the solver registry with every compiled-in solver
#[cfg_attr(not(feature = "porkbun"), allow(unused_variables))]
async fn build_registry(config: &Config) -> Result<SolverRegistry> {
    let registry = SolverRegistry::new(config.group_name.clone())?;
    let secret_store = Arc::new(DirSecretStore::new(&config.secrets_dir));
    let ctx = SolverContext::new(secret_store).with_client(config.client_config());

    #[cfg(feature = "porkbun")]
    {
        info!("Registering Porkbun solver");
        dns01_provider_porkbun::register(&registry, ctx).await?;
    }

    if registry.list_solvers().is_empty() {
        warn!("No solvers compiled in; enable the `porkbun` feature");
    }

    Ok(registry)
}
