//! OCI implementation of the [`Provider`] interface.
//!
//! Three service clients (compute, virtual network, limits) share one signed
//! transport. The composite operations issue the mutating call and then poll
//! the resource until it reaches the awaited lifecycle state.

mod compute;
mod error;
mod limits;
mod network;
mod signer;
mod transport;
mod wait;

use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::profile::OciProfile;
use crate::provider::{
    CreateSubnetDetails, CreateVcnDetails, Instance, InstanceId, InstanceState,
    LaunchInstanceDetails, LimitValue, Provider, ProviderFuture, Subnet, SubnetId, SubnetState,
    Vcn, VcnId, VcnState, Vnic, VnicAttachment, VnicId,
};
use compute::ComputeClient;
use limits::LimitsClient;
use network::VirtualNetworkClient;
use transport::ApiClient;
use wait::{Progress, Target};

pub use error::OciError;
pub use signer::{ContentHeaders, RequestSigner, SignedRequest, SignerError, http_date};
pub use wait::{POLL_INTERVAL, WAIT_TIMEOUT, WaitPolicy};

const USER_AGENT: &str = concat!("oci-launch/", env!("CARGO_PKG_VERSION"));

/// Service endpoints used by the provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoints {
    /// Core Services base URL (compute and virtual network).
    pub core: String,
    /// Limits service base URL.
    pub limits: String,
}

impl Endpoints {
    /// Public endpoints for `region` in the commercial realm.
    #[must_use]
    pub fn for_region(region: &str) -> Self {
        Self {
            core: format!("https://iaas.{region}.oraclecloud.com/20160918"),
            limits: format!("https://limits.{region}.oci.oraclecloud.com/20190729"),
        }
    }
}

/// Provider that talks to the OCI REST APIs.
#[derive(Clone, Debug)]
pub struct OciProvider {
    compute: ComputeClient,
    network: VirtualNetworkClient,
    limits: LimitsClient,
    wait: WaitPolicy,
}

impl OciProvider {
    /// Builds a provider for the profile's region, signing with its key.
    ///
    /// # Errors
    ///
    /// Returns [`OciError`] when the profile is invalid, the key cannot be
    /// loaded, or the HTTP client cannot be built.
    pub fn new(profile: &OciProfile, wait: WaitPolicy) -> Result<Self, OciError> {
        profile.validate()?;
        let signer = RequestSigner::from_profile(profile)?;
        Self::with_endpoints(signer, &Endpoints::for_region(&profile.region), wait)
    }

    /// Builds a provider against explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`OciError`] when an endpoint is malformed or the HTTP client
    /// cannot be built.
    pub fn with_endpoints(
        signer: RequestSigner,
        endpoints: &Endpoints,
        wait: WaitPolicy,
    ) -> Result<Self, OciError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let shared = Arc::new(signer);
        let core = ApiClient::new(http.clone(), Arc::clone(&shared), &endpoints.core)?;
        let limits = ApiClient::new(http, shared, &endpoints.limits)?;
        Ok(Self {
            compute: ComputeClient::new(core.clone()),
            network: VirtualNetworkClient::new(core),
            limits: LimitsClient::new(limits),
            wait,
        })
    }

    async fn create_vcn(&self, details: &CreateVcnDetails) -> Result<Vcn, OciError> {
        details.validate()?;
        let created = self.network.create_vcn(details).await?;
        info!(vcn_id = %created.id, "VCN requested");
        let id = &created.id.clone();
        let network = &self.network;
        wait::until_reached(
            self.wait,
            Target {
                resource: "VCN",
                id: id.as_str(),
                state: "AVAILABLE",
            },
            created,
            |vcn: &Vcn| match vcn.lifecycle_state {
                VcnState::Available => Progress::Reached,
                VcnState::Terminating | VcnState::Terminated => {
                    Progress::Doomed(vcn.lifecycle_state.to_string())
                }
                other => Progress::Pending(other.to_string()),
            },
            move || network.get_vcn(id),
        )
        .await
    }

    async fn delete_vcn(&self, id: &VcnId) -> Result<(), OciError> {
        self.network.delete_vcn(id).await?;
        info!(vcn_id = %id, "VCN deletion requested");
        let network = &self.network;
        wait::until_gone(
            self.wait,
            Target {
                resource: "VCN",
                id: id.as_str(),
                state: "TERMINATED",
            },
            |vcn: &Vcn| vcn.lifecycle_state == VcnState::Terminated,
            move || network.get_vcn(id),
        )
        .await
    }

    async fn create_subnet(&self, details: &CreateSubnetDetails) -> Result<Subnet, OciError> {
        details.validate()?;
        let created = self.network.create_subnet(details).await?;
        info!(subnet_id = %created.id, vcn_id = %details.vcn_id, "subnet requested");
        let id = &created.id.clone();
        let network = &self.network;
        wait::until_reached(
            self.wait,
            Target {
                resource: "subnet",
                id: id.as_str(),
                state: "AVAILABLE",
            },
            created,
            |subnet: &Subnet| match subnet.lifecycle_state {
                SubnetState::Available => Progress::Reached,
                SubnetState::Terminating | SubnetState::Terminated => {
                    Progress::Doomed(subnet.lifecycle_state.to_string())
                }
                other => Progress::Pending(other.to_string()),
            },
            move || network.get_subnet(id),
        )
        .await
    }

    async fn delete_subnet(&self, id: &SubnetId) -> Result<(), OciError> {
        self.network.delete_subnet(id).await?;
        info!(subnet_id = %id, "subnet deletion requested");
        let network = &self.network;
        wait::until_gone(
            self.wait,
            Target {
                resource: "subnet",
                id: id.as_str(),
                state: "TERMINATED",
            },
            |subnet: &Subnet| subnet.lifecycle_state == SubnetState::Terminated,
            move || network.get_subnet(id),
        )
        .await
    }

    async fn launch_instance(&self, details: &LaunchInstanceDetails) -> Result<Instance, OciError> {
        details.validate()?;
        let created = self.compute.launch_instance(details).await?;
        info!(instance_id = %created.id, shape = %details.shape, "instance launch requested");
        let id = &created.id.clone();
        let compute = &self.compute;
        wait::until_reached(
            self.wait,
            Target {
                resource: "instance",
                id: id.as_str(),
                state: "RUNNING",
            },
            created,
            |instance: &Instance| match instance.lifecycle_state {
                InstanceState::Running => Progress::Reached,
                InstanceState::Terminating | InstanceState::Terminated => {
                    Progress::Doomed(instance.lifecycle_state.to_string())
                }
                other => Progress::Pending(other.to_string()),
            },
            move || compute.get_instance(id),
        )
        .await
    }

    async fn terminate_instance(&self, id: &InstanceId) -> Result<(), OciError> {
        self.compute.terminate_instance(id).await?;
        info!(instance_id = %id, "instance termination requested");
        let compute = &self.compute;
        wait::until_gone(
            self.wait,
            Target {
                resource: "instance",
                id: id.as_str(),
                state: "TERMINATED",
            },
            |instance: &Instance| instance.lifecycle_state == InstanceState::Terminated,
            move || compute.get_instance(id),
        )
        .await
    }
}

impl Provider for OciProvider {
    type Error = OciError;

    fn create_vcn_and_wait<'a>(
        &'a self,
        details: &'a CreateVcnDetails,
    ) -> ProviderFuture<'a, Vcn, Self::Error> {
        Box::pin(self.create_vcn(details))
    }

    fn delete_vcn_and_wait<'a>(&'a self, id: &'a VcnId) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(self.delete_vcn(id))
    }

    fn create_subnet_and_wait<'a>(
        &'a self,
        details: &'a CreateSubnetDetails,
    ) -> ProviderFuture<'a, Subnet, Self::Error> {
        Box::pin(self.create_subnet(details))
    }

    fn delete_subnet_and_wait<'a>(
        &'a self,
        id: &'a SubnetId,
    ) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(self.delete_subnet(id))
    }

    fn launch_instance_and_wait<'a>(
        &'a self,
        details: &'a LaunchInstanceDetails,
    ) -> ProviderFuture<'a, Instance, Self::Error> {
        Box::pin(self.launch_instance(details))
    }

    fn terminate_instance_and_wait<'a>(
        &'a self,
        id: &'a InstanceId,
    ) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(self.terminate_instance(id))
    }

    fn list_vnic_attachments<'a>(
        &'a self,
        compartment_id: &'a str,
        instance_id: &'a InstanceId,
    ) -> ProviderFuture<'a, Vec<VnicAttachment>, Self::Error> {
        Box::pin(self.compute.list_vnic_attachments(compartment_id, instance_id))
    }

    fn get_vnic<'a>(&'a self, id: &'a VnicId) -> ProviderFuture<'a, Vnic, Self::Error> {
        Box::pin(self.network.get_vnic(id))
    }

    fn list_limit_values<'a>(
        &'a self,
        compartment_id: &'a str,
        service_name: &'a str,
    ) -> ProviderFuture<'a, Vec<LimitValue>, Self::Error> {
        Box::pin(self.limits.list_limit_values(compartment_id, service_name))
    }
}
