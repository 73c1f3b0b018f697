//! Orchestrates a full launch: provision, inspect, settle, tear down.
//!
//! Provisioning creates a VCN, a subnet inside it and an instance attached to
//! that subnet. Inspection prints the instance's primary VNIC and the
//! compartment's service limits. Teardown always runs, after a fixed settle
//! delay, and releases exactly the resources that were created in reverse
//! order.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

use crate::lease::{Lease, Leases, Release, ReleaseFailure};
use crate::provider::{
    CreateSubnetDetails, CreateVcnDetails, Instance, InstanceId, LaunchInstanceDetails,
    LimitValue, Provider, ProviderError, Subnet, SubnetId, Vcn, VcnId, Vnic, VnicAttachmentId,
};
use crate::report::Report;

/// Pause between inspection and teardown.
pub const SETTLE_DELAY: Duration = Duration::from_secs(60);

const DONE_BANNER: &str = "-- Done. Script execution completed ....";

/// Everything a launch needs, already validated by
/// [`LaunchConfig::as_plan`](crate::config::LaunchConfig::as_plan).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchPlan {
    /// Compartment owning every resource (the tenancy root compartment).
    pub compartment_id: String,
    /// Availability domain for the subnet and instance.
    pub availability_domain: String,
    /// Instance shape.
    pub shape: String,
    /// Boot image OCID.
    pub image_id: String,
    /// CIDR block of the VCN; the subnet reuses it.
    pub cidr_block: String,
    /// Public key text injected as `ssh_authorized_keys`, verbatim.
    pub ssh_public_key: String,
    /// VCN display name.
    pub vcn_display_name: String,
    /// Subnet display name.
    pub subnet_display_name: String,
    /// Instance display name.
    pub instance_display_name: String,
    /// Key of the extra metadata entry.
    pub extra_metadata_key: String,
    /// Value of the extra metadata entry.
    pub extra_metadata_value: String,
    /// Limits service queried during inspection.
    pub limits_service_name: String,
}

/// Identifiers and inspection results of a completed launch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchSummary {
    /// VCN that was created and deleted.
    pub vcn_id: VcnId,
    /// Subnet that was created and deleted.
    pub subnet_id: SubnetId,
    /// Instance that was launched and terminated.
    pub instance_id: InstanceId,
    /// Primary VNIC of the instance.
    pub vnic: Vnic,
    /// Limit values returned for the configured service.
    pub limits: Vec<LimitValue>,
}

/// Errors surfaced by [`LaunchOrchestrator::execute`].
#[derive(Debug, Error)]
pub enum LaunchError<E>
where
    E: std::error::Error + 'static,
{
    /// Raised when a request cannot be assembled.
    #[error("invalid request: {0}")]
    Request(#[from] ProviderError),
    /// Raised when the VCN cannot be created.
    #[error("failed to create VCN: {0}")]
    CreateVcn(#[source] E),
    /// Raised when the subnet cannot be created.
    #[error("failed to create subnet: {0}")]
    CreateSubnet(#[source] E),
    /// Raised when the instance cannot be launched.
    #[error("failed to launch instance: {0}")]
    LaunchInstance(#[source] E),
    /// Raised when the VNIC lookup fails.
    #[error("failed to inspect instance networking: {0}")]
    Inspect(#[source] E),
    /// Raised when the instance reports no VNIC attachment.
    #[error("instance {instance_id} has no VNIC attachment")]
    NoVnicAttachment {
        /// Instance that was inspected.
        instance_id: InstanceId,
    },
    /// Raised when the first attachment has no VNIC yet.
    #[error("VNIC attachment {attachment_id} has no VNIC yet")]
    VnicPending {
        /// Attachment without a VNIC.
        attachment_id: VnicAttachmentId,
    },
    /// Raised when the service limits cannot be listed.
    #[error("failed to list {service} limits: {source}")]
    Limits {
        /// Limits service name.
        service: String,
        /// Provider error.
        #[source]
        source: E,
    },
    /// Raised when teardown fails, whether or not the run failed earlier.
    #[error("{}", teardown_message(.resource, .source, .leaked, .primary.as_deref()))]
    Teardown {
        /// Resource whose release failed.
        resource: String,
        /// Every resource left behind, failed one first.
        leaked: Vec<String>,
        /// Message of the error that aborted the run before teardown.
        primary: Option<String>,
        /// Provider error returned by the failed release.
        #[source]
        source: E,
    },
}

impl<E> LaunchError<E>
where
    E: std::error::Error + 'static,
{
    fn teardown(failure: ReleaseFailure<E>, primary: Option<String>) -> Self {
        let leaked = failure.leaked();
        Self::Teardown {
            resource: format!("{} {}", failure.failed.kind(), failure.failed.id()),
            leaked,
            primary,
            source: failure.source,
        }
    }
}

fn teardown_message<E: std::fmt::Display>(
    resource: &str,
    source: &E,
    leaked: &[String],
    primary: Option<&str>,
) -> String {
    let message = format!(
        "failed to release {resource}: {source}; left behind: {}",
        leaked.join(", ")
    );
    match primary {
        Some(earlier) => format!("{earlier} (teardown also failed: {message})"),
        None => message,
    }
}

/// Runs the launch flow against a provider.
#[derive(Debug)]
pub struct LaunchOrchestrator<P> {
    provider: P,
    settle_delay: Duration,
}

impl<P> LaunchOrchestrator<P>
where
    P: Provider,
{
    /// Creates a new orchestrator that waits [`SETTLE_DELAY`] before teardown.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Overrides the settle delay.
    ///
    /// This is primarily used by tests to keep scenarios fast.
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Provisions, inspects and tears down, writing the report to `out`.
    ///
    /// Teardown is always attempted. A teardown failure is surfaced even when
    /// provisioning succeeded, and carries the earlier error when it did not.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when provisioning, inspection, or teardown
    /// fail.
    pub async fn execute<W: Write>(
        &self,
        plan: &LaunchPlan,
        out: W,
    ) -> Result<LaunchSummary, LaunchError<P::Error>> {
        let mut report = Report::new(out);
        let mut leases = Leases::new();

        let outcome = self.provision_and_inspect(plan, &mut leases, &mut report).await;
        let teardown = self.teardown(leases, &mut report).await;

        match (outcome, teardown) {
            (Ok(summary), Ok(())) => {
                report.line(DONE_BANNER);
                Ok(summary)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(_), Err(failure)) => Err(LaunchError::teardown(failure, None)),
            (Err(err), Err(failure)) => Err(LaunchError::teardown(failure, Some(err.to_string()))),
        }
    }

    async fn provision_and_inspect<W: Write>(
        &self,
        plan: &LaunchPlan,
        leases: &mut Leases,
        report: &mut Report<W>,
    ) -> Result<LaunchSummary, LaunchError<P::Error>> {
        let vcn = self.create_vcn(plan, leases, report).await?;
        let subnet = self.create_subnet(plan, &vcn, leases, report).await?;
        let instance = self.launch_instance(plan, &subnet, leases, report).await?;

        let vnic = self.primary_vnic(plan, &instance).await?;
        report.section("Virtual Network Interface Card", &vnic);

        let limits = self
            .provider
            .list_limit_values(&plan.compartment_id, &plan.limits_service_name)
            .await
            .map_err(|source| LaunchError::Limits {
                service: plan.limits_service_name.clone(),
                source,
            })?;
        report.section("Object Storage Limits free-tier", &limits);

        Ok(LaunchSummary {
            vcn_id: vcn.id,
            subnet_id: subnet.id,
            instance_id: instance.id,
            vnic,
            limits,
        })
    }

    async fn create_vcn<W: Write>(
        &self,
        plan: &LaunchPlan,
        leases: &mut Leases,
        report: &mut Report<W>,
    ) -> Result<Vcn, LaunchError<P::Error>> {
        let details =
            CreateVcnDetails::new(&plan.compartment_id, &plan.cidr_block, &plan.vcn_display_name)?;
        let vcn = self
            .provider
            .create_vcn_and_wait(&details)
            .await
            .map_err(LaunchError::CreateVcn)?;
        leases.acquire(Lease::Vcn(vcn.clone()));
        info!(vcn_id = %vcn.id, "VCN available");
        report.resource("Created VCN", vcn.id.as_str(), &vcn);
        Ok(vcn)
    }

    async fn create_subnet<W: Write>(
        &self,
        plan: &LaunchPlan,
        vcn: &Vcn,
        leases: &mut Leases,
        report: &mut Report<W>,
    ) -> Result<Subnet, LaunchError<P::Error>> {
        let details =
            CreateSubnetDetails::for_vcn(vcn, &plan.availability_domain, &plan.subnet_display_name)?;
        let subnet = self
            .provider
            .create_subnet_and_wait(&details)
            .await
            .map_err(LaunchError::CreateSubnet)?;
        leases.acquire(Lease::Subnet(subnet.clone()));
        info!(subnet_id = %subnet.id, "subnet available");
        report.resource("Created Subnet", subnet.id.as_str(), &subnet);
        Ok(subnet)
    }

    async fn launch_instance<W: Write>(
        &self,
        plan: &LaunchPlan,
        subnet: &Subnet,
        leases: &mut Leases,
        report: &mut Report<W>,
    ) -> Result<Instance, LaunchError<P::Error>> {
        report.line("Launching Instance ...");
        let details = LaunchInstanceDetails::builder()
            .compartment_id(&plan.compartment_id)
            .availability_domain(&plan.availability_domain)
            .shape(&plan.shape)
            .display_name(&plan.instance_display_name)
            .image_id(&plan.image_id)
            .subnet_id(&subnet.id)
            .ssh_authorized_keys(&plan.ssh_public_key)
            .metadata_item(&plan.extra_metadata_key, &plan.extra_metadata_value)
            .build()?;
        let instance = self
            .provider
            .launch_instance_and_wait(&details)
            .await
            .map_err(LaunchError::LaunchInstance)?;
        leases.acquire(Lease::Instance(instance.clone()));
        info!(instance_id = %instance.id, "instance running");
        report.resource("Launched Instance", instance.id.as_str(), &instance);
        Ok(instance)
    }

    /// Resolves the first VNIC attachment of `instance` to its VNIC.
    async fn primary_vnic(
        &self,
        plan: &LaunchPlan,
        instance: &Instance,
    ) -> Result<Vnic, LaunchError<P::Error>> {
        let attachments = self
            .provider
            .list_vnic_attachments(&plan.compartment_id, &instance.id)
            .await
            .map_err(LaunchError::Inspect)?;
        let attachment = attachments
            .into_iter()
            .next()
            .ok_or_else(|| LaunchError::NoVnicAttachment {
                instance_id: instance.id.clone(),
            })?;
        let vnic_id = attachment.vnic_id.ok_or(LaunchError::VnicPending {
            attachment_id: attachment.id,
        })?;
        self.provider
            .get_vnic(&vnic_id)
            .await
            .map_err(LaunchError::Inspect)
    }

    async fn teardown<W: Write>(
        &self,
        leases: Leases,
        report: &mut Report<W>,
    ) -> Result<(), ReleaseFailure<P::Error>> {
        report.notice(&format!(
            "......Sleeping for {} seconds before destroying ..... ",
            self.settle_delay.as_secs()
        ));
        sleep(self.settle_delay).await;

        leases
            .release_all(&self.provider, |event| match event {
                Release::Started(Lease::Instance(instance)) => {
                    report.line(&format!("Terminating Instance: {}", instance.id));
                }
                Release::Started(_) => {}
                Release::Finished(Lease::Instance(instance)) => {
                    report.line(&format!("Terminated Instance: {}", instance.id));
                    report.blank();
                }
                Release::Finished(lease) => {
                    report.line(&format!("Deleted {}: {}", lease.kind(), lease.id()));
                    report.blank();
                }
            })
            .await
    }
}
