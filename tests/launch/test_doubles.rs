//! Test doubles for the launch orchestrator.
//!
//! Provides a recording provider that answers every call immediately with a
//! resource in its target state, logs each call with its target identifier,
//! and can be told to fail at named operations.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use oci_launch::provider::{
    CreateSubnetDetails, CreateVcnDetails, Instance, InstanceId, InstanceState,
    LaunchInstanceDetails, LimitValue, Provider, ProviderFuture, Subnet, SubnetId, SubnetState,
    Vcn, VcnId, VcnState, Vnic, VnicAttachment, VnicAttachmentId, VnicId,
};
use thiserror::Error;

pub const VCN_ID: &str = "ocid1.vcn.oc1.iad.test";
pub const SUBNET_ID: &str = "ocid1.subnet.oc1.iad.test";
pub const INSTANCE_ID: &str = "ocid1.instance.oc1.iad.test";
pub const ATTACHMENT_ID: &str = "ocid1.vnicattachment.oc1.iad.test";
pub const VNIC_ID: &str = "ocid1.vnic.oc1.iad.test";

/// One recorded provider call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub target: String,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    failures: Vec<String>,
    no_attachments: bool,
    subnet_request: Option<CreateSubnetDetails>,
    launch_request: Option<LaunchInstanceDetails>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingProvider {
    state: Arc<Mutex<State>>,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{op} refused by test provider")]
pub struct RecordedError {
    op: &'static str,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|err| panic!("recording provider lock poisoned: {err}"));
        f(&mut state)
    }

    pub fn fail_at(&self, op: &str) {
        self.with_state(|state| state.failures.push(op.to_owned()));
    }

    pub fn without_attachments(&self) {
        self.with_state(|state| state.no_attachments = true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with_state(|state| state.calls.clone())
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|call| call.op).collect()
    }

    pub fn target_of(&self, op: &str) -> Option<String> {
        self.calls()
            .into_iter()
            .find(|call| call.op == op)
            .map(|call| call.target)
    }

    pub fn subnet_request(&self) -> Option<CreateSubnetDetails> {
        self.with_state(|state| state.subnet_request.clone())
    }

    pub fn launch_request(&self) -> Option<LaunchInstanceDetails> {
        self.with_state(|state| state.launch_request.clone())
    }

    fn record(&self, op: &'static str, target: impl Into<String>) -> Result<(), RecordedError> {
        self.with_state(|state| {
            state.calls.push(Call {
                op,
                target: target.into(),
            });
            if state.failures.iter().any(|failure| failure == op) {
                Err(RecordedError { op })
            } else {
                Ok(())
            }
        })
    }
}

fn vcn(details: &CreateVcnDetails) -> Vcn {
    Vcn {
        id: VcnId::new(VCN_ID),
        compartment_id: details.compartment_id.clone(),
        cidr_block: details.cidr_block.clone(),
        cidr_blocks: vec![details.cidr_block.clone()],
        display_name: Some(details.display_name.clone()),
        lifecycle_state: VcnState::Available,
        default_route_table_id: None,
        default_security_list_id: None,
        time_created: None,
        extra: serde_json::Map::new(),
    }
}

fn subnet(details: &CreateSubnetDetails) -> Subnet {
    Subnet {
        id: SubnetId::new(SUBNET_ID),
        vcn_id: details.vcn_id.clone(),
        compartment_id: details.compartment_id.clone(),
        cidr_block: details.cidr_block.clone(),
        availability_domain: Some(details.availability_domain.clone()),
        display_name: Some(details.display_name.clone()),
        lifecycle_state: SubnetState::Available,
        virtual_router_ip: None,
        time_created: None,
        extra: serde_json::Map::new(),
    }
}

fn instance(details: &LaunchInstanceDetails) -> Instance {
    Instance {
        id: InstanceId::new(INSTANCE_ID),
        compartment_id: details.compartment_id.clone(),
        availability_domain: details.availability_domain.clone(),
        shape: details.shape.clone(),
        display_name: Some(details.display_name.clone()),
        lifecycle_state: InstanceState::Running,
        region: Some(String::from("us-ashburn-1")),
        metadata: BTreeMap::new(),
        time_created: None,
        extra: serde_json::Map::new(),
    }
}

impl Provider for RecordingProvider {
    type Error = RecordedError;

    fn create_vcn_and_wait<'a>(
        &'a self,
        details: &'a CreateVcnDetails,
    ) -> ProviderFuture<'a, Vcn, Self::Error> {
        Box::pin(async move {
            self.record("create_vcn", details.display_name.as_str())?;
            Ok(vcn(details))
        })
    }

    fn delete_vcn_and_wait<'a>(&'a self, id: &'a VcnId) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(async move { self.record("delete_vcn", id.as_str()) })
    }

    fn create_subnet_and_wait<'a>(
        &'a self,
        details: &'a CreateSubnetDetails,
    ) -> ProviderFuture<'a, Subnet, Self::Error> {
        Box::pin(async move {
            self.with_state(|state| state.subnet_request = Some(details.clone()));
            self.record("create_subnet", details.vcn_id.as_str())?;
            Ok(subnet(details))
        })
    }

    fn delete_subnet_and_wait<'a>(
        &'a self,
        id: &'a SubnetId,
    ) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(async move { self.record("delete_subnet", id.as_str()) })
    }

    fn launch_instance_and_wait<'a>(
        &'a self,
        details: &'a LaunchInstanceDetails,
    ) -> ProviderFuture<'a, Instance, Self::Error> {
        Box::pin(async move {
            self.with_state(|state| state.launch_request = Some(details.clone()));
            self.record(
                "launch_instance",
                details.create_vnic_details.subnet_id.as_str(),
            )?;
            Ok(instance(details))
        })
    }

    fn terminate_instance_and_wait<'a>(
        &'a self,
        id: &'a InstanceId,
    ) -> ProviderFuture<'a, (), Self::Error> {
        Box::pin(async move { self.record("terminate_instance", id.as_str()) })
    }

    fn list_vnic_attachments<'a>(
        &'a self,
        _compartment_id: &'a str,
        instance_id: &'a InstanceId,
    ) -> ProviderFuture<'a, Vec<VnicAttachment>, Self::Error> {
        Box::pin(async move {
            self.record("list_vnic_attachments", instance_id.as_str())?;
            if self.with_state(|state| state.no_attachments) {
                return Ok(Vec::new());
            }
            Ok(vec![VnicAttachment {
                id: VnicAttachmentId::new(ATTACHMENT_ID),
                instance_id: instance_id.clone(),
                vnic_id: Some(VnicId::new(VNIC_ID)),
                subnet_id: Some(SubnetId::new(SUBNET_ID)),
                lifecycle_state: String::from("ATTACHED"),
                extra: serde_json::Map::new(),
            }])
        })
    }

    fn get_vnic<'a>(&'a self, id: &'a VnicId) -> ProviderFuture<'a, Vnic, Self::Error> {
        Box::pin(async move {
            self.record("get_vnic", id.as_str())?;
            Ok(Vnic {
                id: id.clone(),
                subnet_id: SubnetId::new(SUBNET_ID),
                compartment_id: None,
                display_name: Some(String::from("my_sdk_instance")),
                is_primary: Some(true),
                private_ip: Some(String::from("10.0.0.2")),
                public_ip: Some(String::from("203.0.113.10")),
                mac_address: None,
                hostname_label: None,
                lifecycle_state: String::from("AVAILABLE"),
                extra: serde_json::Map::new(),
            })
        })
    }

    fn list_limit_values<'a>(
        &'a self,
        _compartment_id: &'a str,
        service_name: &'a str,
    ) -> ProviderFuture<'a, Vec<LimitValue>, Self::Error> {
        Box::pin(async move {
            self.record("list_limit_values", service_name)?;
            Ok(vec![LimitValue {
                name: String::from("storage-bytes"),
                scope_type: String::from("REGION"),
                availability_domain: None,
                value: 21_474_836_480,
            }])
        })
    }
}
