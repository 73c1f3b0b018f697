//! Request bodies for the provisioning calls.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ProviderError;
use super::ids::{SubnetId, VcnId};
use super::models::Vcn;

/// Metadata key the instance image reads authorised SSH keys from.
pub const SSH_AUTHORIZED_KEYS: &str = "ssh_authorized_keys";

fn require(value: &str, field: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::Validation(field.to_owned()));
    }
    Ok(())
}

/// Parameters for creating a VCN.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVcnDetails {
    /// Compartment to create the VCN in.
    pub compartment_id: String,
    /// IPv4 CIDR block for the VCN.
    pub cidr_block: String,
    /// Human readable name.
    pub display_name: String,
}

impl CreateVcnDetails {
    /// Builds validated VCN creation details, trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] when any field is empty.
    pub fn new(
        compartment_id: impl Into<String>,
        cidr_block: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let details = Self {
            compartment_id: compartment_id.into().trim().to_owned(),
            cidr_block: cidr_block.into().trim().to_owned(),
            display_name: display_name.into().trim().to_owned(),
        };
        details.validate()?;
        Ok(details)
    }

    /// Validates that every field is populated.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ProviderError> {
        require(&self.compartment_id, "compartment_id")?;
        require(&self.cidr_block, "cidr_block")?;
        require(&self.display_name, "display_name")
    }
}

/// Parameters for creating a subnet inside an existing VCN.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubnetDetails {
    /// Compartment to create the subnet in.
    pub compartment_id: String,
    /// Availability domain for an AD-specific subnet.
    pub availability_domain: String,
    /// Human readable name.
    pub display_name: String,
    /// Parent VCN.
    pub vcn_id: VcnId,
    /// IPv4 CIDR block, which must fall inside the VCN's range.
    pub cidr_block: String,
}

impl CreateSubnetDetails {
    /// Builds subnet details that inherit the compartment and CIDR block of
    /// `vcn`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] when any field is empty.
    pub fn for_vcn(
        vcn: &Vcn,
        availability_domain: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let details = Self {
            compartment_id: vcn.compartment_id.clone(),
            availability_domain: availability_domain.into().trim().to_owned(),
            display_name: display_name.into().trim().to_owned(),
            vcn_id: vcn.id.clone(),
            cidr_block: vcn.cidr_block.clone(),
        };
        details.validate()?;
        Ok(details)
    }

    /// Validates that every field is populated.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ProviderError> {
        require(&self.compartment_id, "compartment_id")?;
        require(&self.availability_domain, "availability_domain")?;
        require(&self.display_name, "display_name")?;
        require(self.vcn_id.as_str(), "vcn_id")?;
        require(&self.cidr_block, "cidr_block")
    }
}

/// Boot source for a new instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "sourceType")]
pub enum InstanceSourceDetails {
    /// Boot from a platform or custom image.
    #[serde(rename = "image")]
    Image {
        /// Image OCID.
        #[serde(rename = "imageId")]
        image_id: String,
    },
}

/// Primary VNIC settings for a new instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    /// Subnet the primary VNIC attaches to.
    pub subnet_id: SubnetId,
}

/// Parameters for launching an instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    /// Compartment to launch the instance in.
    pub compartment_id: String,
    /// Availability domain hosting the instance.
    pub availability_domain: String,
    /// Shape (machine type).
    pub shape: String,
    /// Human readable name.
    pub display_name: String,
    /// Instance metadata, passed verbatim to the image's init tooling.
    pub metadata: BTreeMap<String, String>,
    /// Boot source.
    pub source_details: InstanceSourceDetails,
    /// Primary VNIC settings.
    pub create_vnic_details: CreateVnicDetails,
}

impl LaunchInstanceDetails {
    /// Starts a builder for [`LaunchInstanceDetails`].
    #[must_use]
    pub fn builder() -> LaunchInstanceDetailsBuilder {
        LaunchInstanceDetailsBuilder::default()
    }

    /// Validates that every required field is populated.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ProviderError> {
        require(&self.compartment_id, "compartment_id")?;
        require(&self.availability_domain, "availability_domain")?;
        require(&self.shape, "shape")?;
        require(&self.display_name, "display_name")?;
        let InstanceSourceDetails::Image { image_id } = &self.source_details;
        require(image_id, "image_id")?;
        require(self.create_vnic_details.subnet_id.as_str(), "subnet_id")
    }
}

/// Builder for [`LaunchInstanceDetails`]; trims identifiers and validates on
/// build. Metadata values are kept verbatim.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LaunchInstanceDetailsBuilder {
    compartment_id: String,
    availability_domain: String,
    shape: String,
    display_name: String,
    image_id: String,
    subnet_id: String,
    metadata: BTreeMap<String, String>,
}

impl LaunchInstanceDetailsBuilder {
    /// Sets the compartment identifier.
    #[must_use]
    pub fn compartment_id(mut self, value: impl Into<String>) -> Self {
        self.compartment_id = value.into();
        self
    }

    /// Sets the availability domain.
    #[must_use]
    pub fn availability_domain(mut self, value: impl Into<String>) -> Self {
        self.availability_domain = value.into();
        self
    }

    /// Sets the shape.
    #[must_use]
    pub fn shape(mut self, value: impl Into<String>) -> Self {
        self.shape = value.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, value: impl Into<String>) -> Self {
        self.display_name = value.into();
        self
    }

    /// Sets the boot image.
    #[must_use]
    pub fn image_id(mut self, value: impl Into<String>) -> Self {
        self.image_id = value.into();
        self
    }

    /// Sets the subnet for the primary VNIC.
    #[must_use]
    pub fn subnet_id(mut self, value: &SubnetId) -> Self {
        self.subnet_id = value.as_str().to_owned();
        self
    }

    /// Injects the public key text as `ssh_authorized_keys` metadata.
    #[must_use]
    pub fn ssh_authorized_keys(self, key: impl Into<String>) -> Self {
        self.metadata_item(SSH_AUTHORIZED_KEYS, key)
    }

    /// Adds an arbitrary metadata entry.
    #[must_use]
    pub fn metadata_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds and validates the [`LaunchInstanceDetails`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] when any required field is empty.
    pub fn build(self) -> Result<LaunchInstanceDetails, ProviderError> {
        let details = LaunchInstanceDetails {
            compartment_id: self.compartment_id.trim().to_owned(),
            availability_domain: self.availability_domain.trim().to_owned(),
            shape: self.shape.trim().to_owned(),
            display_name: self.display_name.trim().to_owned(),
            metadata: self.metadata,
            source_details: InstanceSourceDetails::Image {
                image_id: self.image_id.trim().to_owned(),
            },
            create_vnic_details: CreateVnicDetails {
                subnet_id: SubnetId::new(self.subnet_id.trim()),
            },
        };
        details.validate()?;
        Ok(details)
    }
}
