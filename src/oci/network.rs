//! Virtual network service client (VCNs, subnets, VNICs).

use crate::provider::{
    CreateSubnetDetails, CreateVcnDetails, Subnet, SubnetId, Vcn, VcnId, Vnic, VnicId,
};

use super::error::OciError;
use super::transport::ApiClient;

#[derive(Clone, Debug)]
pub(crate) struct VirtualNetworkClient {
    api: ApiClient,
}

impl VirtualNetworkClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub(crate) async fn create_vcn(&self, details: &CreateVcnDetails) -> Result<Vcn, OciError> {
        self.api.post("vcns", details).await
    }

    pub(crate) async fn get_vcn(&self, id: &VcnId) -> Result<Vcn, OciError> {
        self.api.get(&format!("vcns/{id}")).await
    }

    pub(crate) async fn delete_vcn(&self, id: &VcnId) -> Result<(), OciError> {
        self.api.delete(&format!("vcns/{id}")).await
    }

    pub(crate) async fn create_subnet(
        &self,
        details: &CreateSubnetDetails,
    ) -> Result<Subnet, OciError> {
        self.api.post("subnets", details).await
    }

    pub(crate) async fn get_subnet(&self, id: &SubnetId) -> Result<Subnet, OciError> {
        self.api.get(&format!("subnets/{id}")).await
    }

    pub(crate) async fn delete_subnet(&self, id: &SubnetId) -> Result<(), OciError> {
        self.api.delete(&format!("subnets/{id}")).await
    }

    pub(crate) async fn get_vnic(&self, id: &VnicId) -> Result<Vnic, OciError> {
        self.api.get(&format!("vnics/{id}")).await
    }
}
