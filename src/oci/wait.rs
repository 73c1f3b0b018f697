//! Lifecycle wait helpers behind the composite "and wait" operations.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use super::error::OciError;

/// Default delay between state polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound for a single wait.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(1200);

/// Polling cadence and deadline for lifecycle waits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPolicy {
    /// Delay between polls.
    pub poll_interval: Duration,
    /// Maximum time spent waiting for one resource.
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            timeout: WAIT_TIMEOUT,
        }
    }
}

/// What a wait is tracking, used for logs and error messages.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Target<'a> {
    pub(crate) resource: &'static str,
    pub(crate) id: &'a str,
    pub(crate) state: &'static str,
}

/// Polls until `state_of` classifies the latest snapshot as reached.
///
/// A doomed snapshot (for example `TERMINATED` while waiting for `RUNNING`)
/// ends the wait immediately.
pub(crate) async fn until_reached<T, S, F, Fut>(
    policy: WaitPolicy,
    target: Target<'_>,
    initial: T,
    state_of: S,
    fetch: F,
) -> Result<T, OciError>
where
    S: Fn(&T) -> Progress,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, OciError>>,
{
    let started = Instant::now();
    let mut current = initial;

    loop {
        match state_of(&current) {
            Progress::Reached => return Ok(current),
            Progress::Doomed(state) => {
                return Err(OciError::UnexpectedState {
                    resource: target.resource,
                    id: target.id.to_owned(),
                    state,
                    target: target.state,
                });
            }
            Progress::Pending(state) => {
                if started.elapsed() >= policy.timeout {
                    return Err(timeout(target, started));
                }
                debug!(
                    resource = target.resource,
                    id = target.id,
                    state = %state,
                    awaiting = target.state,
                    "resource not ready yet"
                );
            }
        }

        sleep(policy.poll_interval).await;
        current = fetch().await?;
    }
}

/// Polls until the resource reports a terminal state or disappears (404).
pub(crate) async fn until_gone<T, G, F, Fut>(
    policy: WaitPolicy,
    target: Target<'_>,
    is_gone: G,
    fetch: F,
) -> Result<(), OciError>
where
    G: Fn(&T) -> bool,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, OciError>>,
{
    let started = Instant::now();

    loop {
        match fetch().await {
            Ok(snapshot) if is_gone(&snapshot) => return Ok(()),
            Ok(_) => {}
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        }

        if started.elapsed() >= policy.timeout {
            return Err(timeout(target, started));
        }
        debug!(
            resource = target.resource,
            id = target.id,
            "waiting for resource to terminate"
        );
        sleep(policy.poll_interval).await;
    }
}

/// Classification of a snapshot relative to the awaited state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Progress {
    Reached,
    Pending(String),
    Doomed(String),
}

fn timeout(target: Target<'_>, started: Instant) -> OciError {
    OciError::WaitTimeout {
        resource: target.resource,
        id: target.id.to_owned(),
        target: target.state,
        waited_secs: started.elapsed().as_secs(),
    }
}
