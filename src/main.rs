use bgptriage::models::session::{DEFAULT_AFI_SAFI, DEFAULT_INSTANCE_NAME};
use bgptriage::{Result, SessionKey, TriageConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bgptriage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "BGP session alert triage: intent vs. reality gating", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ./bgptriage.toml, then ~/.bgptriage/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate intent (and optional telemetry) files offline
    Evaluate {
        /// Intent record (JSON or YAML)
        #[arg(long)]
        intent: PathBuf,

        /// Telemetry snapshot (JSON or YAML)
        #[arg(long)]
        telemetry: Option<PathBuf>,

        /// Only proceed when admin is enabled and oper is not up
        #[arg(long)]
        strict: bool,

        #[arg(long)]
        json: bool,
    },

    /// Decode states and print the diagnostic hint for a telemetry file
    Hint {
        /// Telemetry snapshot (JSON or YAML)
        #[arg(long)]
        telemetry: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Run the quarantine flow for one session against live backends
    Triage {
        /// Device name
        device: String,

        /// Peer address
        peer: String,

        #[arg(long, default_value = DEFAULT_AFI_SAFI)]
        afi_safi: String,

        /// Routing instance name
        #[arg(long, default_value = DEFAULT_INSTANCE_NAME)]
        instance: String,

        /// Force strict gating (also settable in config)
        #[arg(long)]
        strict: bool,

        #[arg(long)]
        json: bool,
    },

    /// Record that a session alert resolved
    Resolve {
        device: String,

        peer: String,

        #[arg(long, default_value = DEFAULT_AFI_SAFI)]
        afi_safi: String,

        #[arg(long, default_value = DEFAULT_INSTANCE_NAME)]
        instance: String,
    },

    /// Run the Alertmanager webhook receiver
    Serve {
        /// Listen port (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default bgptriage.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(command: &Commands) {
    let default_level = match command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.command);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            intent,
            telemetry,
            strict,
            json,
        } => {
            bgptriage::cli::evaluate::run(&intent, telemetry.as_deref(), strict, json)?;
        }

        Commands::Hint { telemetry, json } => {
            bgptriage::cli::hint::run(&telemetry, json)?;
        }

        Commands::Triage {
            device,
            peer,
            afi_safi,
            instance,
            strict,
            json,
        } => {
            let config = TriageConfig::load(cli.config.as_deref())?;
            let key = SessionKey::new(device, peer)
                .with_afi_safi(afi_safi)
                .with_instance(instance);
            bgptriage::cli::triage::run(&config, key, strict, json).await?;
        }

        Commands::Resolve {
            device,
            peer,
            afi_safi,
            instance,
        } => {
            let config = TriageConfig::load(cli.config.as_deref())?;
            let key = SessionKey::new(device, peer)
                .with_afi_safi(afi_safi)
                .with_instance(instance);
            bgptriage::cli::triage::resolve(&config, key).await?;
        }

        Commands::Serve { port } => {
            let config = TriageConfig::load(cli.config.as_deref())?;
            bgptriage::cli::serve::run(config, port).await?;
        }

        Commands::Init { force } => {
            bgptriage::cli::init::run(cli.config.as_deref(), force)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "bgptriage", &mut io::stdout());
        }
    }

    Ok(())
}
