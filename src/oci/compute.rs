//! Compute service client (instances and VNIC attachments).

use crate::provider::{Instance, InstanceId, LaunchInstanceDetails, VnicAttachment};

use super::error::OciError;
use super::transport::ApiClient;

#[derive(Clone, Debug)]
pub(crate) struct ComputeClient {
    api: ApiClient,
}

impl ComputeClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub(crate) async fn launch_instance(
        &self,
        details: &LaunchInstanceDetails,
    ) -> Result<Instance, OciError> {
        self.api.post("instances/", details).await
    }

    pub(crate) async fn get_instance(&self, id: &InstanceId) -> Result<Instance, OciError> {
        self.api.get(&format!("instances/{id}")).await
    }

    /// Terminates the instance; its boot volume is deleted with it.
    pub(crate) async fn terminate_instance(&self, id: &InstanceId) -> Result<(), OciError> {
        self.api.delete(&format!("instances/{id}")).await
    }

    pub(crate) async fn list_vnic_attachments(
        &self,
        compartment_id: &str,
        instance_id: &InstanceId,
    ) -> Result<Vec<VnicAttachment>, OciError> {
        self.api
            .list_all(
                "vnicAttachments/",
                &[
                    ("compartmentId", compartment_id),
                    ("instanceId", instance_id.as_str()),
                ],
            )
            .await
    }
}
