//! Provider abstraction for the network and compute resources a launch
//! provisions.
//!
//! Every mutating call is a composite "and wait" operation: it returns only
//! once the provider reports the resource in its target lifecycle state.

mod ids;
mod models;
mod requests;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use ids::{InstanceId, SubnetId, VcnId, VnicAttachmentId, VnicId};
pub use models::{
    Instance, InstanceState, LimitValue, Subnet, SubnetState, Vcn, VcnState, Vnic, VnicAttachment,
};
pub use requests::{
    CreateSubnetDetails, CreateVcnDetails, CreateVnicDetails, InstanceSourceDetails,
    LaunchInstanceDetails, LaunchInstanceDetailsBuilder, SSH_AUTHORIZED_KEYS,
};

/// Errors raised while assembling provider requests.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProviderError {
    /// Raised when a request is missing a required field.
    #[error("missing or empty field: {0}")]
    Validation(String),
}

/// Future returned by provider operations.
pub type ProviderFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Interface implemented by cloud providers able to host a launch.
pub trait Provider {
    /// Provider specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a VCN and waits until it is `AVAILABLE`.
    fn create_vcn_and_wait<'a>(
        &'a self,
        details: &'a CreateVcnDetails,
    ) -> ProviderFuture<'a, Vcn, Self::Error>;

    /// Deletes a VCN and waits until it is `TERMINATED`.
    fn delete_vcn_and_wait<'a>(&'a self, id: &'a VcnId) -> ProviderFuture<'a, (), Self::Error>;

    /// Creates a subnet and waits until it is `AVAILABLE`.
    fn create_subnet_and_wait<'a>(
        &'a self,
        details: &'a CreateSubnetDetails,
    ) -> ProviderFuture<'a, Subnet, Self::Error>;

    /// Deletes a subnet and waits until it is `TERMINATED`.
    fn delete_subnet_and_wait<'a>(
        &'a self,
        id: &'a SubnetId,
    ) -> ProviderFuture<'a, (), Self::Error>;

    /// Launches an instance and waits until it is `RUNNING`.
    fn launch_instance_and_wait<'a>(
        &'a self,
        details: &'a LaunchInstanceDetails,
    ) -> ProviderFuture<'a, Instance, Self::Error>;

    /// Terminates an instance and waits until it is `TERMINATED`.
    fn terminate_instance_and_wait<'a>(
        &'a self,
        id: &'a InstanceId,
    ) -> ProviderFuture<'a, (), Self::Error>;

    /// Lists every VNIC attachment of an instance, following pagination.
    fn list_vnic_attachments<'a>(
        &'a self,
        compartment_id: &'a str,
        instance_id: &'a InstanceId,
    ) -> ProviderFuture<'a, Vec<VnicAttachment>, Self::Error>;

    /// Fetches a VNIC.
    fn get_vnic<'a>(&'a self, id: &'a VnicId) -> ProviderFuture<'a, Vnic, Self::Error>;

    /// Lists the limit values of a service for a compartment, following
    /// pagination.
    fn list_limit_values<'a>(
        &'a self,
        compartment_id: &'a str,
        service_name: &'a str,
    ) -> ProviderFuture<'a, Vec<LimitValue>, Self::Error>;
}
