//! Binary entry point for the `oci-launch` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use oci_launch::{
    ConfigError, KeyError, LaunchConfig, LaunchError, LaunchOrchestrator, OciError, OciProfile,
    OciProvider, ProfileError, load_public_key,
};

mod cli;

use cli::Cli;

const DEFAULT_LOG_FILTER: &str = "oci_launch=warn";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("OCI profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("provider setup failed: {0}")]
    Provider(#[from] OciError),
    #[error("launch failed: {0}")]
    Launch(#[from] LaunchError<OciError>),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let public_key = load_public_key(&cli.public_key_path)?;

    let config = LaunchConfig::load_without_cli_args()?;
    config.validate()?;
    let profile = OciProfile::load(&config.oci_config_file, &config.oci_profile)?;
    info!(profile = %profile.name, region = %profile.region, "loaded OCI profile");

    let plan = config.as_plan(&profile.tenancy, public_key)?;
    let provider = OciProvider::new(&profile, config.wait_policy())?;
    let summary = LaunchOrchestrator::new(provider)
        .execute(&plan, io::stdout())
        .await?;
    debug!(instance_id = %summary.instance_id, "launch completed");
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
