//! BDD scenarios for the launch workflow.

use rstest_bdd_macros::scenario;

use super::test_helpers::{LaunchContext, launch_context};

#[scenario(
    path = "tests/features/launch.feature",
    name = "Provision, inspect and tear down in reverse order"
)]
fn scenario_happy_path(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "VCN creation failure releases nothing"
)]
fn scenario_vcn_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Subnet creation failure deletes only the VCN"
)]
fn scenario_subnet_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Instance launch failure deletes the subnet and VCN"
)]
fn scenario_instance_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Inspection failure still tears everything down"
)]
fn scenario_inspection_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Missing VNIC attachment is a hard failure"
)]
fn scenario_missing_attachment(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Teardown failure stops the remaining releases"
)]
fn scenario_teardown_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}

#[scenario(
    path = "tests/features/launch.feature",
    name = "Teardown failure after a run failure keeps both errors"
)]
fn scenario_double_failure(launch_context: LaunchContext) {
    let _ = launch_context;
}
