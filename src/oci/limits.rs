//! Limits service client.

use crate::provider::LimitValue;

use super::error::OciError;
use super::transport::ApiClient;

#[derive(Clone, Debug)]
pub(crate) struct LimitsClient {
    api: ApiClient,
}

impl LimitsClient {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub(crate) async fn list_limit_values(
        &self,
        compartment_id: &str,
        service_name: &str,
    ) -> Result<Vec<LimitValue>, OciError> {
        self.api
            .list_all(
                "limitValues",
                &[
                    ("compartmentId", compartment_id),
                    ("serviceName", service_name),
                ],
            )
            .await
    }
}
