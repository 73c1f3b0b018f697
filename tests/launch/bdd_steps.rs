//! BDD step definitions for the launch workflow.

use std::time::Duration;

use oci_launch::LaunchOrchestrator;
use oci_launch::provider::SSH_AUTHORIZED_KEYS;
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_doubles::{INSTANCE_ID, SUBNET_ID, VCN_ID};
use super::test_helpers::{LaunchContext, LaunchResult};
use crate::test_constants::{CIDR_BLOCK, COMPARTMENT_ID, PUBLIC_KEY};

const DONE_BANNER: &str = "-- Done. Script execution completed ....";

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a provider that accepts every request")]
fn accepting_provider(launch_context: LaunchContext) -> LaunchContext {
    launch_context
}

#[given("a provider that fails at \"{op}\"")]
fn failing_provider(launch_context: LaunchContext, op: String) -> LaunchContext {
    launch_context.provider.fail_at(op.trim());
    launch_context
}

#[given("the provider also fails at \"{op}\"")]
fn also_failing_provider(launch_context: LaunchContext, op: String) -> LaunchContext {
    launch_context.provider.fail_at(op.trim());
    launch_context
}

#[given("a provider that reports no VNIC attachments")]
fn provider_without_attachments(launch_context: LaunchContext) -> LaunchContext {
    launch_context.provider.without_attachments();
    launch_context
}

#[when("I run the launch")]
fn run_launch(launch_context: LaunchContext) -> Result<LaunchContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let LaunchContext { provider, plan, .. } = launch_context;
    let orchestrator =
        LaunchOrchestrator::new(provider.clone()).with_settle_delay(Duration::ZERO);

    let mut out = Vec::new();
    let result = runtime.block_on(orchestrator.execute(&plan, &mut out));
    let outcome = match result {
        Ok(summary) => LaunchResult::Success(Box::new(summary)),
        Err(err) => LaunchResult::Failure(err.to_string()),
    };
    let report = String::from_utf8(out).map_err(|err| StepError::Assertion(err.to_string()))?;

    Ok(LaunchContext {
        provider,
        plan,
        outcome: Some(outcome),
        report,
    })
}

#[then("the launch succeeds")]
fn launch_succeeds(launch_context: &LaunchContext) -> Result<(), StepError> {
    match &launch_context.outcome {
        Some(LaunchResult::Success(summary)) if summary.instance_id.as_str() == INSTANCE_ID => {
            Ok(())
        }
        other => Err(StepError::Assertion(format!(
            "unexpected outcome: {other:?}"
        ))),
    }
}

#[then("the launch fails with \"{expected}\"")]
fn launch_fails_with(launch_context: &LaunchContext, expected: String) -> Result<(), StepError> {
    match &launch_context.outcome {
        Some(LaunchResult::Failure(message)) if message.contains(expected.as_str()) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure containing '{expected}', got: {other:?}"
        ))),
    }
}

#[then("the provider calls are \"{expected}\"")]
fn provider_calls_are(launch_context: &LaunchContext, expected: String) -> Result<(), StepError> {
    let wanted: Vec<&str> = expected.split(',').map(str::trim).collect();
    let actual = launch_context.provider.ops();
    if actual == wanted {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected calls {wanted:?}, got {actual:?}"
        )))
    }
}

#[then("each teardown call targets the identifier returned at creation")]
fn teardown_targets_created_ids(launch_context: &LaunchContext) -> Result<(), StepError> {
    let provider = &launch_context.provider;
    for (op, created) in [
        ("terminate_instance", INSTANCE_ID),
        ("delete_subnet", SUBNET_ID),
        ("delete_vcn", VCN_ID),
    ] {
        match provider.target_of(op) {
            Some(target) if target != created => {
                return Err(StepError::Assertion(format!(
                    "{op} targeted {target}, expected {created}"
                )));
            }
            _ => {}
        }
    }
    if provider.target_of("delete_vcn").is_none() {
        return Err(StepError::Assertion(String::from(
            "delete_vcn should always run once the VCN exists",
        )));
    }
    Ok(())
}

#[then("the subnet inherits the VCN compartment and CIDR block")]
fn subnet_inherits_vcn(launch_context: &LaunchContext) -> Result<(), StepError> {
    let request = launch_context
        .provider
        .subnet_request()
        .ok_or_else(|| StepError::Assertion(String::from("subnet was never requested")))?;
    if request.vcn_id.as_str() == VCN_ID
        && request.compartment_id == COMPARTMENT_ID
        && request.cidr_block == CIDR_BLOCK
    {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected subnet request: {request:?}"
        )))
    }
}

#[then("the instance metadata carries the public key verbatim")]
fn metadata_carries_key(launch_context: &LaunchContext) -> Result<(), StepError> {
    let request = launch_context
        .provider
        .launch_request()
        .ok_or_else(|| StepError::Assertion(String::from("instance was never launched")))?;
    let key = request.metadata.get(SSH_AUTHORIZED_KEYS).map(String::as_str);
    let extra = request.metadata.get("some_metadata_item").map(String::as_str);
    if key == Some(PUBLIC_KEY) && extra == Some("some_item_value") {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "unexpected metadata: {:?}",
            request.metadata
        )))
    }
}

#[then("the report ends with the completion banner")]
fn report_ends_with_banner(launch_context: &LaunchContext) -> Result<(), StepError> {
    let report = &launch_context.report;
    let expected_order = [
        format!("Created VCN: {VCN_ID}"),
        format!("Created Subnet: {SUBNET_ID}"),
        String::from("Launching Instance ..."),
        format!("Launched Instance: {INSTANCE_ID}"),
        String::from("Virtual Network Interface Card"),
        String::from("Object Storage Limits free-tier"),
        String::from("......Sleeping for 0 seconds before destroying ..... "),
        format!("Terminating Instance: {INSTANCE_ID}"),
        format!("Terminated Instance: {INSTANCE_ID}"),
        format!("Deleted Subnet: {SUBNET_ID}"),
        format!("Deleted VCN: {VCN_ID}"),
    ];
    let mut cursor = 0;
    for line in &expected_order {
        let Some(found) = report.get(cursor..).and_then(|rest| rest.find(line.as_str())) else {
            return Err(StepError::Assertion(format!(
                "report is missing '{line}' in order:\n{report}"
            )));
        };
        cursor += found + line.len();
    }
    if report.trim_end().ends_with(DONE_BANNER) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "report should end with the banner:\n{report}"
        )))
    }
}

#[then("the report does not contain the completion banner")]
fn report_lacks_banner(launch_context: &LaunchContext) -> Result<(), StepError> {
    if launch_context.report.contains(DONE_BANNER) {
        Err(StepError::Assertion(format!(
            "failed run printed the banner:\n{}",
            launch_context.report
        )))
    } else {
        Ok(())
    }
}
