//! Command-line interface definitions for the `oci-launch` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `oci-launch` binary.
#[derive(Debug, Parser)]
#[command(
    name = "oci-launch",
    version,
    about = "Provision a VCN, subnet and instance on OCI, inspect them, then tear everything down",
    after_help = concat!(
        "Settings load from oci-launch.toml and OCI_LAUNCH_* environment variables. ",
        "Credentials come from the OCI config file (default ~/.oci/config, profile DEFAULT)."
    )
)]
pub(crate) struct Cli {
    /// Path to the public SSH key injected into the instance (for example
    /// `~/.ssh/id_ed25519.pub`). `~` and environment variables are expanded.
    #[arg(value_name = "PUBLIC_KEY")]
    pub(crate) public_key_path: String,
}
