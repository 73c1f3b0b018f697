//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::launch::LaunchPlan;
use crate::oci::WaitPolicy;
use crate::profile::{DEFAULT_CONFIG_FILE, DEFAULT_PROFILE};

const CONFIG_FILE: &str = "oci-launch.toml";

/// Launch settings derived from defaults, configuration files and
/// environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "OCI_LAUNCH",
    discovery(
        app_name = "oci-launch",
        env_var = "OCI_LAUNCH_CONFIG_PATH",
        config_file_name = "oci-launch.toml",
        dotfile_name = ".oci-launch.toml",
        project_file_name = "oci-launch.toml"
    )
)]
pub struct LaunchConfig {
    /// Availability domain hosting the subnet and instance.
    #[ortho_config(default = "ZMvy:US-ASHBURN-AD-2".to_owned())]
    pub availability_domain: String,
    /// Compute shape. Defaults to the always-free micro shape.
    #[ortho_config(default = "VM.Standard.E2.1.Micro".to_owned())]
    pub shape: String,
    /// Boot image OCID.
    #[ortho_config(
        default = "ocid1.image.oc1.iad.aaaaaaaa6blpytk5nu622uj7trevp7kjxihx4byt4q6botynbyjpknk7zwna"
            .to_owned()
    )]
    pub image_id: String,
    /// CIDR block shared by the VCN and its single subnet.
    #[ortho_config(default = "10.0.0.0/24".to_owned())]
    pub cidr_block: String,
    /// Display name for the VCN.
    #[ortho_config(default = "my_sdk_vcn".to_owned())]
    pub vcn_display_name: String,
    /// Display name for the subnet.
    #[ortho_config(default = "my_sdk_subnet".to_owned())]
    pub subnet_display_name: String,
    /// Display name for the instance.
    #[ortho_config(default = "my_sdk_instance".to_owned())]
    pub instance_display_name: String,
    /// Key of the extra metadata entry attached to the instance.
    #[ortho_config(default = "some_metadata_item".to_owned())]
    pub extra_metadata_key: String,
    /// Value of the extra metadata entry.
    #[ortho_config(default = "some_item_value".to_owned())]
    pub extra_metadata_value: String,
    /// Limits service queried during inspection.
    #[ortho_config(default = "object-storage".to_owned())]
    pub limits_service_name: String,
    /// Path of the OCI credential file. Supports `~` and environment
    /// variables.
    #[ortho_config(default = DEFAULT_CONFIG_FILE.to_owned())]
    pub oci_config_file: String,
    /// Profile to read from the OCI credential file.
    #[ortho_config(default = DEFAULT_PROFILE.to_owned())]
    pub oci_profile: String,
    /// Upper bound, in seconds, for each lifecycle wait.
    #[ortho_config(default = 1200)]
    pub wait_timeout_secs: u64,
    /// Delay, in seconds, between lifecycle polls.
    #[ortho_config(default = 5)]
    pub poll_interval_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn hint(&self) -> String {
        format!(
            "set {} or add top-level `{}` to {CONFIG_FILE}",
            self.env_var, self.toml_key
        )
    }
}

impl LaunchConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: {}",
                metadata.description,
                metadata.hint()
            )));
        }
        Ok(())
    }

    fn require_positive(value: u64, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "{} must be greater than zero: {}",
                metadata.description,
                metadata.hint()
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("oci-launch")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and TOML key that supply each value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::InvalidValue`] when a duration is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (
                &self.availability_domain,
                FieldMetadata::new(
                    "availability domain",
                    "OCI_LAUNCH_AVAILABILITY_DOMAIN",
                    "availability_domain",
                ),
            ),
            (
                &self.shape,
                FieldMetadata::new("instance shape", "OCI_LAUNCH_SHAPE", "shape"),
            ),
            (
                &self.image_id,
                FieldMetadata::new("image OCID", "OCI_LAUNCH_IMAGE_ID", "image_id"),
            ),
            (
                &self.cidr_block,
                FieldMetadata::new("CIDR block", "OCI_LAUNCH_CIDR_BLOCK", "cidr_block"),
            ),
            (
                &self.vcn_display_name,
                FieldMetadata::new(
                    "VCN display name",
                    "OCI_LAUNCH_VCN_DISPLAY_NAME",
                    "vcn_display_name",
                ),
            ),
            (
                &self.subnet_display_name,
                FieldMetadata::new(
                    "subnet display name",
                    "OCI_LAUNCH_SUBNET_DISPLAY_NAME",
                    "subnet_display_name",
                ),
            ),
            (
                &self.instance_display_name,
                FieldMetadata::new(
                    "instance display name",
                    "OCI_LAUNCH_INSTANCE_DISPLAY_NAME",
                    "instance_display_name",
                ),
            ),
            (
                &self.extra_metadata_key,
                FieldMetadata::new(
                    "extra metadata key",
                    "OCI_LAUNCH_EXTRA_METADATA_KEY",
                    "extra_metadata_key",
                ),
            ),
            (
                &self.limits_service_name,
                FieldMetadata::new(
                    "limits service name",
                    "OCI_LAUNCH_LIMITS_SERVICE_NAME",
                    "limits_service_name",
                ),
            ),
            (
                &self.oci_config_file,
                FieldMetadata::new(
                    "OCI config file",
                    "OCI_LAUNCH_OCI_CONFIG_FILE",
                    "oci_config_file",
                ),
            ),
            (
                &self.oci_profile,
                FieldMetadata::new("OCI profile name", "OCI_LAUNCH_OCI_PROFILE", "oci_profile"),
            ),
        ];
        for (value, metadata) in &fields {
            Self::require_field(value, metadata)?;
        }

        Self::require_positive(
            self.wait_timeout_secs,
            &FieldMetadata::new(
                "wait timeout",
                "OCI_LAUNCH_WAIT_TIMEOUT_SECS",
                "wait_timeout_secs",
            ),
        )?;
        Self::require_positive(
            self.poll_interval_secs,
            &FieldMetadata::new(
                "poll interval",
                "OCI_LAUNCH_POLL_INTERVAL_SECS",
                "poll_interval_secs",
            ),
        )
    }

    /// Returns the lifecycle wait policy described by this configuration.
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.wait_timeout_secs),
        }
    }

    /// Builds a [`LaunchPlan`] for `compartment_id` that injects
    /// `ssh_public_key` into the instance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the compartment is
    /// empty.
    pub fn as_plan(
        &self,
        compartment_id: &str,
        ssh_public_key: impl Into<String>,
    ) -> Result<LaunchPlan, ConfigError> {
        self.validate()?;
        if compartment_id.trim().is_empty() {
            return Err(ConfigError::MissingField(String::from(
                "missing compartment: set tenancy in the OCI profile",
            )));
        }
        Ok(LaunchPlan {
            compartment_id: compartment_id.trim().to_owned(),
            availability_domain: self.availability_domain.trim().to_owned(),
            shape: self.shape.trim().to_owned(),
            image_id: self.image_id.trim().to_owned(),
            cidr_block: self.cidr_block.trim().to_owned(),
            ssh_public_key: ssh_public_key.into(),
            vcn_display_name: self.vcn_display_name.trim().to_owned(),
            subnet_display_name: self.subnet_display_name.trim().to_owned(),
            instance_display_name: self.instance_display_name.trim().to_owned(),
            extra_metadata_key: self.extra_metadata_key.trim().to_owned(),
            extra_metadata_value: self.extra_metadata_value.clone(),
            limits_service_name: self.limits_service_name.trim().to_owned(),
        })
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is out of range.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
