//! Probe-then-create idempotency primitive
//!
//! Every resource this tool manages (bucket, role, cluster) follows the same
//! shape: probe the service for existing state, and only when the service
//! reports the resource as absent, create it. [`ensure`] captures that shape
//! once so each provisioner only supplies the probe and create steps.

use std::future::Future;

/// Outcome of probing an external service for an existing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// The resource already exists; carries whatever the probe learned
    /// (e.g. a role ARN).
    Found(T),
    /// The service reported the resource as absent.
    Absent,
}

/// Ensure a remote resource exists.
///
/// Runs `probe` first. On [`Probe::Found`] the probed value is returned and
/// the service is never mutated. On [`Probe::Absent`] the `create` step runs
/// and its result is returned. Probe failures other than "absent" must be
/// surfaced as errors by the probe closure itself; they abort the ensure.
pub async fn ensure<T, E, P, PF, C, CF>(probe: P, create: C) -> Result<T, E>
where
    P: FnOnce() -> PF,
    PF: Future<Output = Result<Probe<T>, E>>,
    C: FnOnce() -> CF,
    CF: Future<Output = Result<T, E>>,
{
    match probe().await? {
        Probe::Found(value) => Ok(value),
        Probe::Absent => create().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn found_resource_skips_create() {
        let creations = AtomicUsize::new(0);
        let result: Result<&str, String> = ensure(
            || async { Ok(Probe::Found("existing")) },
            || async {
                creations.fetch_add(1, Ordering::SeqCst);
                Ok("created")
            },
        )
        .await;

        assert_eq!(result.unwrap(), "existing");
        assert_eq!(creations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_resource_runs_create() {
        let result: Result<&str, String> =
            ensure(|| async { Ok(Probe::Absent) }, || async { Ok("created") }).await;

        assert_eq!(result.unwrap(), "created");
    }

    #[tokio::test]
    async fn probe_error_aborts_without_create() {
        let creations = AtomicUsize::new(0);
        let result: Result<&str, String> = ensure(
            || async { Err("probe failed".to_string()) },
            || async {
                creations.fetch_add(1, Ordering::SeqCst);
                Ok("created")
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "probe failed");
        assert_eq!(creations.load(Ordering::SeqCst), 0);
    }
}
