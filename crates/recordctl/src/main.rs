// # recordctl - DNS Record Lifecycle Driver
//
// Thin driver that runs exactly one lifecycle operation against a state file.
//
// - All record logic lives in record-core; this binary only wires it up
// - Configuration is via environment variables ONLY
// - One operation per invocation, then exit
//
// ## Usage
//
// ```text
// recordctl <create|read|update|delete|migrate> <state-file>
// ```
//
// The state file holds a single flat instance (JSON). For `create`, write the
// declared attributes (`domain`, `name`, `type`, `value`, optional `ttl` and
// `priority`) with an empty `id`. State written by an older schema version is
// migrated before any operation runs.
//
// ## Configuration
//
// - `RECORD_CLIENT_TYPE`: DNS client type, resolved through the client registry (default cloudflare)
// - `RECORD_CLIENT_API_TOKEN`: API token (required)
// - `RECORD_CLIENT_BASE_URL`: API base URL override (optional)
// - `RECORD_CLIENT_TIMEOUT_SECS`: HTTP timeout in seconds (optional, 1-300)
// - `RECORD_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export RECORD_CLIENT_API_TOKEN=your_token
// cat > www.json <<'EOF'
// {"version":"1.0","resource":"dns_record","instance":{"schema_version":1,"id":"",
//  "attributes":{"domain":"example.com","name":"www","type":"A","value":"203.0.113.5"}}}
// EOF
//
// recordctl create www.json
// ```

use anyhow::{Context, Result};
use record_core::config::DEFAULT_TIMEOUT_SECS;
use record_core::{
    ClientConfig, ClientRegistry, InstanceState, RecordResource, ResourceState, SCHEMA_VERSION,
    StateFile,
};
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum RecordExitCode {
    /// Operation completed
    Success = 0,
    /// Usage, configuration or startup error
    ConfigError = 1,
    /// The lifecycle operation failed
    OperationError = 2,
}

impl From<RecordExitCode> for ExitCode {
    fn from(code: RecordExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Lifecycle operation requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Create,
    Read,
    Update,
    Delete,
    Migrate,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Command::Create),
            "read" => Ok(Command::Read),
            "update" => Ok(Command::Update),
            "delete" => Ok(Command::Delete),
            "migrate" => Ok(Command::Migrate),
            other => anyhow::bail!(
                "Unknown command '{}'. Valid commands: create, read, update, delete, migrate",
                other
            ),
        }
    }
}

/// Parsed command-line arguments
#[derive(Debug)]
struct Args {
    command: Command,
    state_path: String,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut args = args.into_iter().skip(1);
        let usage = "Usage: recordctl <create|read|update|delete|migrate> <state-file>";

        let command = args.next().context(usage)?.parse()?;
        let state_path = args.next().context(usage)?;
        if args.next().is_some() {
            anyhow::bail!("Unexpected extra arguments. {}", usage);
        }

        Ok(Self {
            command,
            state_path,
        })
    }
}

/// Application configuration
struct Config {
    client_type: String,
    api_token: String,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let timeout_secs = match env::var("RECORD_CLIENT_TIMEOUT_SECS") {
            Ok(s) => Some(s.parse().with_context(|| {
                format!("RECORD_CLIENT_TIMEOUT_SECS must be a number. Got: {}", s)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            client_type: env::var("RECORD_CLIENT_TYPE")
                .unwrap_or_else(|_| "cloudflare".to_string()),
            api_token: env::var("RECORD_CLIENT_API_TOKEN").context(
                "RECORD_CLIENT_API_TOKEN is required. \
                Set it via: export RECORD_CLIENT_API_TOKEN=your_token",
            )?,
            base_url: env::var("RECORD_CLIENT_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            timeout_secs,
            log_level: env::var("RECORD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.client_type.is_empty() {
            anyhow::bail!("RECORD_CLIENT_TYPE cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "RECORD_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.client_config().validate()?;

        Ok(())
    }

    /// Client configuration handed to the registry
    ///
    /// Types without a dedicated config variant are passed to their factory
    /// as a custom config carrying the same settings.
    fn client_config(&self) -> ClientConfig {
        match self.client_type.as_str() {
            "cloudflare" => ClientConfig::Cloudflare {
                api_token: self.api_token.clone(),
                base_url: self.base_url.clone(),
                timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            other => ClientConfig::Custom {
                factory: other.to_string(),
                config: serde_json::json!({
                    "api_token": self.api_token,
                    "base_url": self.base_url,
                    "timeout_secs": self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                }),
            },
        }
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::parse(env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RecordExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RecordExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    let resource = match build_resource(&config) {
        Ok(resource) => resource,
        Err(e) => {
            error!("Failed to create DNS client: {}", e);
            return RecordExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        match run(&resource, args.command, &args.state_path).await {
            Ok(()) => RecordExitCode::Success,
            Err(e) => {
                error!("{:?} failed: {:#}", args.command, e);
                RecordExitCode::OperationError
            }
        }
    })
    .into()
}

/// Register built-in clients and build the resource adapter
fn build_resource(config: &Config) -> Result<RecordResource> {
    let registry = ClientRegistry::new();

    #[cfg(feature = "cloudflare")]
    record_client_cloudflare::register(&registry);

    let client = registry.create_client(&config.client_config())?;
    info!("Using DNS client: {}", client.client_name());

    Ok(RecordResource::new(client))
}

/// Run one lifecycle operation against the state file
async fn run(resource: &RecordResource, command: Command, state_path: &str) -> Result<()> {
    let state_file = StateFile::new(state_path).await?;
    let mut instance = state_file.load().await?;

    if !instance.is_empty() && instance.schema_version < SCHEMA_VERSION {
        info!(
            "Migrating state from schema version {} to {}",
            instance.schema_version, SCHEMA_VERSION
        );
        instance = resource
            .migrate_state(instance.schema_version, instance)
            .await?;
        state_file.save(&instance).await?;
    }

    match command {
        Command::Migrate => {
            info!("State is at schema version {}", instance.schema_version);
        }
        Command::Create => {
            if !instance.is_empty() {
                anyhow::bail!(
                    "State already tracks record {}; delete it before creating again",
                    instance.id
                );
            }
            let mut state = ResourceState::from_instance(&instance)?;
            resource.create(&mut state).await?;
            state_file.save(&state.to_instance()).await?;
        }
        Command::Read => {
            let mut state = ResourceState::from_instance(&instance)?;
            if resource.refresh(&mut state).await? {
                state_file.save(&state.to_instance()).await?;
            } else {
                warn!("Record no longer exists, clearing state");
                state_file.save(&InstanceState::new("")).await?;
            }
        }
        Command::Update => {
            let mut state = ResourceState::from_instance(&instance)?;
            resource.update(&mut state).await?;
            state_file.save(&state.to_instance()).await?;
        }
        Command::Delete => {
            let state = ResourceState::from_instance(&instance)?;
            resource.delete(&state).await?;
            state_file.save(&InstanceState::new("")).await?;
        }
    }

    info!("{:?} complete: {}", command, state_file.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> Config {
        Config {
            client_type: "cloudflare".to_string(),
            api_token: "test_token".to_string(),
            base_url: None,
            timeout_secs: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_parse_args() {
        let parsed = Args::parse(args(&["recordctl", "update", "www.json"])).unwrap();
        assert_eq!(parsed.command, Command::Update);
        assert_eq!(parsed.state_path, "www.json");
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(Args::parse(args(&["recordctl"])).is_err());
        assert!(Args::parse(args(&["recordctl", "create"])).is_err());
        assert!(Args::parse(args(&["recordctl", "import", "www.json"])).is_err());
        assert!(Args::parse(args(&["recordctl", "read", "a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_validate_config() {
        assert!(config().validate().is_ok());

        let mut cfg = config();
        cfg.client_type = String::new();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.log_level = "loud".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.timeout_secs = Some(0);
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.base_url = Some("ftp://api.example.com".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_client_config_overrides() {
        let mut cfg = config();
        cfg.base_url = Some("http://127.0.0.1:8080".to_string());
        cfg.timeout_secs = Some(5);

        match cfg.client_config() {
            ClientConfig::Cloudflare {
                base_url,
                timeout_secs,
                ..
            } => {
                assert_eq!(base_url.as_deref(), Some("http://127.0.0.1:8080"));
                assert_eq!(timeout_secs, 5);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_client_type_selects_factory() {
        let mut cfg = config();
        cfg.client_type = "route53".to_string();

        let client_config = cfg.client_config();
        assert_eq!(client_config.type_name(), "route53");
        assert!(matches!(client_config, ClientConfig::Custom { .. }));

        let err = build_resource(&cfg).unwrap_err();
        assert!(err.to_string().contains("Unknown client type: route53"));
    }

    #[cfg(feature = "cloudflare")]
    #[test]
    fn test_build_cloudflare_resource() {
        let resource = build_resource(&config()).unwrap();
        assert!(format!("{:?}", resource).contains("cloudflare"));
    }
}
