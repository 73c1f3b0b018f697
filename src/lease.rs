//! Scoped acquisition of provisioned resources.
//!
//! Each resource is recorded as a [`Lease`] the moment its creation call
//! returns. [`Leases::release_all`] hands them back in exact reverse order, so
//! teardown only ever touches resources that were actually created.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::provider::{Instance, Provider, Subnet, Vcn};

/// A provisioned resource that must be released before the run ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lease {
    /// A virtual cloud network.
    Vcn(Vcn),
    /// A subnet inside a leased VCN.
    Subnet(Subnet),
    /// A compute instance attached to a leased subnet.
    Instance(Instance),
}

impl Lease {
    /// Human readable resource kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Vcn(_) => "VCN",
            Self::Subnet(_) => "Subnet",
            Self::Instance(_) => "Instance",
        }
    }

    /// Provider identifier of the leased resource.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Vcn(vcn) => vcn.id.as_str(),
            Self::Subnet(subnet) => subnet.id.as_str(),
            Self::Instance(instance) => instance.id.as_str(),
        }
    }

    async fn release<P: Provider>(&self, provider: &P) -> Result<(), P::Error> {
        match self {
            Self::Vcn(vcn) => provider.delete_vcn_and_wait(&vcn.id).await,
            Self::Subnet(subnet) => provider.delete_subnet_and_wait(&subnet.id).await,
            Self::Instance(instance) => provider.terminate_instance_and_wait(&instance.id).await,
        }
    }
}

/// Progress notifications emitted while releasing leases.
#[derive(Clone, Copy, Debug)]
pub enum Release<'a> {
    /// The release call for this lease is about to be issued.
    Started(&'a Lease),
    /// The provider confirmed the lease is gone.
    Finished(&'a Lease),
}

/// Raised when a release call fails. Remaining leases are not attempted.
#[derive(Debug, Error)]
#[error("failed to release {} {}", .failed.kind(), .failed.id())]
pub struct ReleaseFailure<E>
where
    E: std::error::Error + 'static,
{
    /// Lease whose release call failed.
    pub failed: Lease,
    /// Leases that were never attempted, in the order they would have been
    /// released.
    pub remaining: Vec<Lease>,
    /// Provider error returned by the failed call.
    #[source]
    pub source: E,
}

impl<E> ReleaseFailure<E>
where
    E: std::error::Error + 'static,
{
    /// Identifiers of every resource left behind, failed lease first.
    #[must_use]
    pub fn leaked(&self) -> Vec<String> {
        std::iter::once(&self.failed)
            .chain(&self.remaining)
            .map(|lease| format!("{} {}", lease.kind(), lease.id()))
            .collect()
    }
}

/// Ordered record of acquired resources.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Leases {
    held: Vec<Lease>,
}

impl Leases {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { held: Vec::new() }
    }

    /// Records a newly created resource.
    pub fn acquire(&mut self, lease: Lease) {
        debug!(kind = lease.kind(), id = lease.id(), "lease acquired");
        self.held.push(lease);
    }

    /// The leased VCN, if one was created.
    #[must_use]
    pub fn vcn(&self) -> Option<&Vcn> {
        self.held.iter().find_map(|lease| match lease {
            Lease::Vcn(vcn) => Some(vcn),
            _ => None,
        })
    }

    /// The leased subnet, if one was created.
    #[must_use]
    pub fn subnet(&self) -> Option<&Subnet> {
        self.held.iter().find_map(|lease| match lease {
            Lease::Subnet(subnet) => Some(subnet),
            _ => None,
        })
    }

    /// The leased instance, if one was launched.
    #[must_use]
    pub fn instance(&self) -> Option<&Instance> {
        self.held.iter().find_map(|lease| match lease {
            Lease::Instance(instance) => Some(instance),
            _ => None,
        })
    }

    /// Releases every lease in reverse acquisition order.
    ///
    /// `observe` is called before and after each successful release call.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseFailure`] for the first release call that fails. The
    /// leases behind it are left untouched and reported as remaining.
    pub async fn release_all<P, F>(
        mut self,
        provider: &P,
        mut observe: F,
    ) -> Result<(), ReleaseFailure<P::Error>>
    where
        P: Provider,
        F: FnMut(Release<'_>),
    {
        self.log_skipped();

        while let Some(lease) = self.held.pop() {
            observe(Release::Started(&lease));
            if let Err(source) = lease.release(provider).await {
                let remaining: Vec<Lease> = self.held.drain(..).rev().collect();
                let failure = ReleaseFailure {
                    failed: lease,
                    remaining,
                    source,
                };
                warn!(
                    leaked = ?failure.leaked(),
                    "teardown stopped; resources left behind"
                );
                return Err(failure);
            }
            info!(kind = lease.kind(), id = lease.id(), "lease released");
            observe(Release::Finished(&lease));
        }
        Ok(())
    }

    fn log_skipped(&self) {
        if self.instance().is_none() {
            debug!(kind = "Instance", "never launched; nothing to terminate");
        }
        if self.subnet().is_none() {
            debug!(kind = "Subnet", "never created; nothing to delete");
        }
        if self.vcn().is_none() {
            debug!(kind = "VCN", "never created; nothing to delete");
        }
    }
}
