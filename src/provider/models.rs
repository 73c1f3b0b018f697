//! Resource representations returned by the provider.
//!
//! Field names follow the OCI Core Services JSON shapes (camelCase on the
//! wire). Fields the launch workflow reads are modelled; everything else the
//! service returns is kept in each model's `extra` map so reports show the
//! whole resource.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{InstanceId, SubnetId, VcnId, VnicAttachmentId, VnicId};

/// Lifecycle states reported for a VCN.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VcnState {
    /// Creation is in progress.
    Provisioning,
    /// The VCN can be referenced by subnets.
    Available,
    /// An update is in progress.
    Updating,
    /// Deletion is in progress.
    Terminating,
    /// The VCN is gone.
    Terminated,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Lifecycle states reported for a subnet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubnetState {
    /// Creation is in progress.
    Provisioning,
    /// Instances can attach to the subnet.
    Available,
    /// An update is in progress.
    Updating,
    /// Deletion is in progress.
    Terminating,
    /// The subnet is gone.
    Terminated,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Lifecycle states reported for a compute instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    /// The instance is being moved between hosts.
    Moving,
    /// The instance is being provisioned.
    Provisioning,
    /// The instance is running.
    Running,
    /// The instance is booting.
    Starting,
    /// The instance is shutting down.
    Stopping,
    /// The instance is stopped.
    Stopped,
    /// A custom image is being captured from the instance.
    CreatingImage,
    /// Termination is in progress.
    Terminating,
    /// The instance is gone.
    Terminated,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

macro_rules! state_display {
    ($($name:ident),+) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let rendered = serde_json::to_value(self)
                        .ok()
                        .and_then(|value| value.as_str().map(str::to_owned))
                        .unwrap_or_else(|| format!("{self:?}"));
                    f.write_str(&rendered)
                }
            }
        )+
    };
}

state_display!(VcnState, SubnetState, InstanceState);

/// A virtual cloud network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vcn {
    /// Provider identifier.
    pub id: VcnId,
    /// Compartment owning the VCN.
    pub compartment_id: String,
    /// Primary IPv4 CIDR block.
    pub cidr_block: String,
    /// All IPv4 CIDR blocks assigned to the VCN.
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
    /// User supplied name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current lifecycle state.
    pub lifecycle_state: VcnState,
    /// Route table created alongside the VCN.
    #[serde(default)]
    pub default_route_table_id: Option<String>,
    /// Security list created alongside the VCN.
    #[serde(default)]
    pub default_security_list_id: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub time_created: Option<String>,
    /// Fields the service returned that are not modelled above, kept so the
    /// full resource can be printed.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A subnet inside a VCN.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    /// Provider identifier.
    pub id: SubnetId,
    /// Parent VCN.
    pub vcn_id: VcnId,
    /// Compartment owning the subnet.
    pub compartment_id: String,
    /// IPv4 CIDR block.
    pub cidr_block: String,
    /// Availability domain for AD-specific subnets.
    #[serde(default)]
    pub availability_domain: Option<String>,
    /// User supplied name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current lifecycle state.
    pub lifecycle_state: SubnetState,
    /// Gateway address of the subnet's virtual router.
    #[serde(default)]
    pub virtual_router_ip: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub time_created: Option<String>,
    /// Fields the service returned that are not modelled above, kept so the
    /// full resource can be printed.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A compute instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Provider identifier.
    pub id: InstanceId,
    /// Compartment owning the instance.
    pub compartment_id: String,
    /// Availability domain hosting the instance.
    pub availability_domain: String,
    /// Shape (machine type) of the instance.
    pub shape: String,
    /// User supplied name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current lifecycle state.
    pub lifecycle_state: InstanceState,
    /// Region the instance lives in.
    #[serde(default)]
    pub region: Option<String>,
    /// Instance metadata, including `ssh_authorized_keys`.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub time_created: Option<String>,
    /// Fields the service returned that are not modelled above, kept so the
    /// full resource can be printed.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Binding between an instance and one of its VNICs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnicAttachment {
    /// Provider identifier.
    pub id: VnicAttachmentId,
    /// Instance the VNIC is attached to.
    pub instance_id: InstanceId,
    /// Attached VNIC; absent while the attachment is still being created.
    #[serde(default)]
    pub vnic_id: Option<VnicId>,
    /// Subnet of the attached VNIC.
    #[serde(default)]
    pub subnet_id: Option<SubnetId>,
    /// Attachment lifecycle state (`ATTACHING`, `ATTACHED`, ...).
    pub lifecycle_state: String,
    /// Fields the service returned that are not modelled above, kept so the
    /// full resource can be printed.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A virtual network interface card.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vnic {
    /// Provider identifier.
    pub id: VnicId,
    /// Subnet the VNIC belongs to.
    pub subnet_id: SubnetId,
    /// Compartment owning the VNIC.
    #[serde(default)]
    pub compartment_id: Option<String>,
    /// User supplied name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Whether this is the instance's primary VNIC.
    #[serde(default)]
    pub is_primary: Option<bool>,
    /// Primary private IPv4 address.
    #[serde(default)]
    pub private_ip: Option<String>,
    /// Public IPv4 address, when one was assigned.
    #[serde(default)]
    pub public_ip: Option<String>,
    /// Hardware address.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// DNS hostname label.
    #[serde(default)]
    pub hostname_label: Option<String>,
    /// VNIC lifecycle state.
    pub lifecycle_state: String,
    /// Fields the service returned that are not modelled above, kept so the
    /// full resource can be printed.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single service limit value for a compartment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitValue {
    /// Limit name (for example `storage-bytes`).
    pub name: String,
    /// Scope of the limit (`GLOBAL`, `REGION` or `AD`).
    pub scope_type: String,
    /// Availability domain for AD-scoped limits.
    #[serde(default)]
    pub availability_domain: Option<String>,
    /// Limit value.
    pub value: i64,
}
