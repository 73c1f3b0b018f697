//! Shared fixtures for launch BDD scenarios.

use oci_launch::{LaunchPlan, LaunchSummary};
use rstest::fixture;

use super::test_doubles::RecordingProvider;
use crate::test_constants::{
    AVAILABILITY_DOMAIN, CIDR_BLOCK, COMPARTMENT_ID, IMAGE_ID, PUBLIC_KEY, SHAPE,
};

#[derive(Clone, Debug)]
pub struct LaunchContext {
    pub provider: RecordingProvider,
    pub plan: LaunchPlan,
    pub outcome: Option<LaunchResult>,
    pub report: String,
}

#[derive(Clone, Debug)]
pub enum LaunchResult {
    Success(Box<LaunchSummary>),
    Failure(String),
}

#[fixture]
pub fn launch_context() -> LaunchContext {
    LaunchContext {
        provider: RecordingProvider::new(),
        plan: plan(),
        outcome: None,
        report: String::new(),
    }
}

pub fn plan() -> LaunchPlan {
    LaunchPlan {
        compartment_id: String::from(COMPARTMENT_ID),
        availability_domain: String::from(AVAILABILITY_DOMAIN),
        shape: String::from(SHAPE),
        image_id: String::from(IMAGE_ID),
        cidr_block: String::from(CIDR_BLOCK),
        ssh_public_key: String::from(PUBLIC_KEY),
        vcn_display_name: String::from("my_sdk_vcn"),
        subnet_display_name: String::from("my_sdk_subnet"),
        instance_display_name: String::from("my_sdk_instance"),
        extra_metadata_key: String::from("some_metadata_item"),
        extra_metadata_value: String::from("some_item_value"),
        limits_service_name: String::from("object-storage"),
    }
}
