//! Core library for the `oci-launch` provisioning tool.
//!
//! The crate exposes a provider abstraction for the short-lived network and
//! compute resources of a launch, an Oracle Cloud Infrastructure
//! implementation that talks to the REST APIs directly, and an orchestrator
//! that runs the lifecycle (create VCN → subnet → instance → inspect →
//! settle → tear down in reverse).

pub mod config;
pub mod key;
pub mod launch;
pub mod lease;
pub mod oci;
pub mod profile;
pub mod provider;
mod report;

pub use config::{ConfigError, LaunchConfig};
pub use key::{KeyError, expand_path, load_public_key};
pub use launch::{LaunchError, LaunchOrchestrator, LaunchPlan, LaunchSummary, SETTLE_DELAY};
pub use lease::{Lease, Leases, Release, ReleaseFailure};
pub use oci::{Endpoints, OciError, OciProvider, RequestSigner, WaitPolicy};
pub use profile::{OciProfile, ProfileError};
pub use provider::{Provider, ProviderError, ProviderFuture};
